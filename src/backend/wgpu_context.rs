//! wgpu Resource Context
//!
//! A [`ResourceContext`] that backs swapchain images with wgpu textures.
//!
//! - [`WgpuResourceContext`]: owns the allocator and can be shut down
//! - [`WgpuTextureAllocator`]: creates textures, enforcing device limits and
//!   an optional memory budget
//! - [`WgpuTextureSource`]: a texture plus its default view; hands its bytes
//!   back to the budget when dropped
//!
//! Texture sources are only valid while the context that budgeted them is
//! alive. After [`WgpuResourceContext::shutdown`] every outstanding source
//! reports itself invalid.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crate::errors::{PoolError, Result};
use crate::swapchain::context::{ResourceContext, TextureAllocator, TextureSource};
use crate::swapchain::descriptor::HardwareBufferDescriptor;

/// Bytes and textures currently alive for one allocator.
#[derive(Debug)]
struct MemoryUsage {
    bytes: AtomicU64,
    textures: AtomicUsize,
    /// Cleared when the owning context shuts down.
    live: AtomicBool,
}

impl MemoryUsage {
    fn new() -> Self {
        Self {
            bytes: AtomicU64::new(0),
            textures: AtomicUsize::new(0),
            live: AtomicBool::new(true),
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn release(&self, bytes: u64) {
        self.bytes.fetch_sub(bytes, Ordering::AcqRel);
        self.textures.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Texture source backed by a 2D wgpu texture.
pub struct WgpuTextureSource {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    desc: HardwareBufferDescriptor,
    bytes: u64,
    usage: Arc<MemoryUsage>,
}

impl WgpuTextureSource {
    /// The backing texture.
    #[inline]
    #[must_use]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Default (full-texture) view, usable as a color attachment.
    #[inline]
    #[must_use]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

impl TextureSource for WgpuTextureSource {
    fn descriptor(&self) -> &HardwareBufferDescriptor {
        &self.desc
    }

    fn is_valid(&self) -> bool {
        self.usage.is_live()
    }
}

impl Drop for WgpuTextureSource {
    fn drop(&mut self) {
        self.texture.destroy();
        self.usage.release(self.bytes);
    }
}

impl fmt::Debug for WgpuTextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WgpuTextureSource")
            .field("desc", &self.desc)
            .field("bytes", &self.bytes)
            .finish_non_exhaustive()
    }
}

/// Creates wgpu textures for swapchain images.
pub struct WgpuTextureAllocator {
    device: wgpu::Device,
    memory_budget: Option<u64>,
    usage: Arc<MemoryUsage>,
}

impl WgpuTextureAllocator {
    fn new(device: wgpu::Device, memory_budget: Option<u64>) -> Self {
        Self {
            device,
            memory_budget,
            usage: Arc::new(MemoryUsage::new()),
        }
    }

    /// Claims `bytes` from the budget, failing if it would be exceeded.
    fn reserve(&self, bytes: u64) -> Result<()> {
        let mut current = self.usage.bytes.load(Ordering::Acquire);
        loop {
            let next = current
                .checked_add(bytes)
                .ok_or_else(|| PoolError::exhausted("texture memory counter overflow"))?;
            if let Some(budget) = self.memory_budget
                && next > budget
            {
                return Err(PoolError::exhausted(format!(
                    "memory budget of {budget} bytes exceeded ({current} in use, {bytes} requested)"
                )));
            }
            match self.usage.bytes.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
        self.usage.textures.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Creates a texture, reporting device out-of-memory as exhaustion.
    #[cfg(not(target_arch = "wasm32"))]
    fn create_scoped(&self, desc: &wgpu::TextureDescriptor<'_>) -> Result<wgpu::Texture> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let texture = self.device.create_texture(desc);
        out_of_memory(pollster::block_on(scope.pop()))?;
        Ok(texture)
    }

    // Error scopes resolve on the browser event loop, which cannot be
    // blocked on; out-of-memory surfaces through the uncaptured handler.
    #[cfg(target_arch = "wasm32")]
    fn create_scoped(&self, desc: &wgpu::TextureDescriptor<'_>) -> Result<wgpu::Texture> {
        Ok(self.device.create_texture(desc))
    }
}

/// Maps an error captured by an out-of-memory scope to [`PoolError`].
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn out_of_memory(captured: Option<wgpu::Error>) -> Result<()> {
    match captured {
        None => Ok(()),
        Some(err) => Err(PoolError::exhausted(format!("device out of memory: {err}"))),
    }
}

impl TextureAllocator for WgpuTextureAllocator {
    type Source = WgpuTextureSource;

    fn create_texture_source(&self, desc: &HardwareBufferDescriptor) -> Result<WgpuTextureSource> {
        if !desc.is_allocatable() {
            return Err(PoolError::NotAllocatable {
                width: desc.size.width,
                height: desc.size.height,
            });
        }

        let max_dimension = self.device.limits().max_texture_dimension_2d;
        if desc.size.width > max_dimension || desc.size.height > max_dimension {
            return Err(PoolError::exhausted(format!(
                "{}x{} exceeds the device limit of {max_dimension}",
                desc.size.width, desc.size.height
            )));
        }

        let bytes = desc.allocation_size();
        self.reserve(bytes)?;

        let texture = self.create_scoped(&wgpu::TextureDescriptor {
            label: Some("Swapchain Image"),
            size: wgpu::Extent3d {
                width: desc.size.width,
                height: desc.size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format.texture_format(),
            usage: desc.usage.texture_usages(),
            view_formats: &[],
        })
        .inspect_err(|_| self.usage.release(bytes))?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(WgpuTextureSource {
            texture,
            view,
            desc: *desc,
            bytes,
            usage: Arc::clone(&self.usage),
        })
    }
}

/// Resource context owning a wgpu device's texture allocator.
///
/// Pools hold it through a [`std::sync::Weak`]. Once dropped, or once
/// [`shutdown`](Self::shutdown) has been called, pools can no longer create
/// new texture sources; textures already handed out stay alive.
pub struct WgpuResourceContext {
    allocator: WgpuTextureAllocator,
}

impl WgpuResourceContext {
    /// Creates a context with no memory budget.
    #[must_use]
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            allocator: WgpuTextureAllocator::new(device, None),
        }
    }

    /// Creates a context that refuses allocations beyond `bytes` of live
    /// texture memory.
    #[must_use]
    pub fn with_memory_budget(device: wgpu::Device, bytes: u64) -> Self {
        Self {
            allocator: WgpuTextureAllocator::new(device, Some(bytes)),
        }
    }

    /// Tears the context down. It stops handing out its allocator and the
    /// texture sources it created become invalid.
    pub fn shutdown(&self) {
        if self.allocator.usage.live.swap(false, Ordering::AcqRel) {
            log::info!("wgpu resource context shut down");
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has not been called yet.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.allocator.usage.is_live()
    }

    /// The device textures are created on.
    #[inline]
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.allocator.device
    }

    /// Bytes of texture memory held by texture sources still alive.
    #[must_use]
    pub fn live_bytes(&self) -> u64 {
        self.allocator.usage.bytes.load(Ordering::Acquire)
    }

    /// Number of texture sources still alive.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.allocator.usage.textures.load(Ordering::Acquire)
    }
}

impl ResourceContext for WgpuResourceContext {
    type Allocator = WgpuTextureAllocator;

    fn resource_allocator(&self) -> Option<&WgpuTextureAllocator> {
        self.is_alive().then_some(&self.allocator)
    }
}
