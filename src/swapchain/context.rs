//! Resource Context Contracts
//!
//! The pool does not know how texture sources are made. It reaches them
//! through three traits:
//!
//! - [`ResourceContext`]: held weakly by the pool; hands out its allocator
//!   while it is alive and usable.
//! - [`TextureAllocator`]: builds a texture source from a
//!   [`HardwareBufferDescriptor`], or fails under resource exhaustion.
//! - [`TextureSource`]: the pooled resource itself.

use crate::errors::Result;
use crate::swapchain::descriptor::HardwareBufferDescriptor;

/// A buffer-backed resource usable as a swapchain image.
pub trait TextureSource: Send + Sync + 'static {
    /// The descriptor the backing buffer was allocated with.
    fn descriptor(&self) -> &HardwareBufferDescriptor;

    /// Whether the source finished construction and can be rendered to.
    fn is_valid(&self) -> bool {
        true
    }
}

/// Factory for texture sources.
pub trait TextureAllocator: Send + Sync {
    type Source: TextureSource;

    /// Creates a new texture source satisfying `desc`.
    ///
    /// Returns [`PoolError::ResourceExhausted`](crate::errors::PoolError::ResourceExhausted)
    /// when the device cannot back another buffer.
    fn create_texture_source(&self, desc: &HardwareBufferDescriptor) -> Result<Self::Source>;
}

/// The context whose allocator a pool creates texture sources with.
pub trait ResourceContext: Send + Sync + 'static {
    type Allocator: TextureAllocator;

    /// The allocator, or `None` once the context has been torn down.
    fn resource_allocator(&self) -> Option<&Self::Allocator>;
}

/// Texture source type produced through a context `C`.
pub type SourceOf<C> = <<C as ResourceContext>::Allocator as TextureAllocator>::Source;
