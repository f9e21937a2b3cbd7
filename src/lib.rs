#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Bounded, thread-safe pooling of buffer-backed swapchain images.
//!
//! A [`BufferTexturePool`] hands out texture sources for presentation,
//! takes them back when the frame is done, and releases the ones that
//! exceed its size cap or have idled too long.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use swapchain_pool::{BufferTexturePool, HardwareBufferDescriptor, WgpuResourceContext};
//!
//! let context = Arc::new(WgpuResourceContext::new(device));
//! let pool = BufferTexturePool::with_defaults(
//!     Arc::downgrade(&context),
//!     HardwareBufferDescriptor::for_swapchain_image(1920, 1080),
//! );
//!
//! if let Some(image) = pool.pop() {
//!     // render into image.view() and present ...
//!     pool.push(image);
//! }
//! ```

pub mod backend;
pub mod errors;
pub mod swapchain;
pub mod utils;

pub use backend::{WgpuResourceContext, WgpuTextureAllocator, WgpuTextureSource};
pub use errors::{PoolError, Result};
pub use swapchain::{
    BufferTexturePool, Extent, HardwareBufferDescriptor, HardwareBufferFormat, HardwareBufferUsage,
    ResourceContext, SourceOf, TextureAllocator, TexturePoolSettings, TextureSource,
};
pub use utils::{Clock, ManualClock, SystemClock};
