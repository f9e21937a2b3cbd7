//! Concrete resource contexts.

pub mod wgpu_context;

pub use wgpu_context::{WgpuResourceContext, WgpuTextureAllocator, WgpuTextureSource};
