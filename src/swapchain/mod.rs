//! Swapchain Image Pooling
//!
//! - [`BufferTexturePool`]: bounded, thread-safe cache of swapchain images
//! - [`HardwareBufferDescriptor`]: shape, format and usage of pooled buffers
//! - [`ResourceContext`] / [`TextureAllocator`] / [`TextureSource`]: how the
//!   pool reaches whatever actually allocates buffers
//! - [`TexturePoolSettings`]: size cap and idle limit

pub mod context;
pub mod descriptor;
pub mod settings;
pub mod texture_pool;

pub use context::{ResourceContext, SourceOf, TextureAllocator, TextureSource};
pub use descriptor::{Extent, HardwareBufferDescriptor, HardwareBufferFormat, HardwareBufferUsage};
pub use settings::TexturePoolSettings;
pub use texture_pool::BufferTexturePool;
