//! Hardware Buffer Descriptors
//!
//! A [`HardwareBufferDescriptor`] is the immutable description of the memory
//! a pooled texture source must satisfy: its dimensions, pixel format and
//! usage. Every texture source handed out by one pool shares the same
//! descriptor.

use bitflags::bitflags;

/// Pixel formats a hardware buffer can be allocated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HardwareBufferFormat {
    /// 8 bits per channel RGBA, unsigned normalized.
    ///
    /// This is the format every swapchain image uses.
    #[default]
    R8G8B8A8UNormInt,
}

impl HardwareBufferFormat {
    #[inline]
    #[must_use]
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::R8G8B8A8UNormInt => 4,
        }
    }

    /// The matching wgpu texture format.
    #[inline]
    #[must_use]
    pub fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            Self::R8G8B8A8UNormInt => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

bitflags! {
    /// How a hardware buffer is going to be used.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct HardwareBufferUsage: u32 {
        /// Rendered into as a color attachment.
        const FRAME_BUFFER_ATTACHMENT = 1 << 0;
        /// Handed to the system compositor for presentation.
        const COMPOSITOR_OVERLAY      = 1 << 1;
        /// Sampled from a shader.
        const SAMPLED_IMAGE           = 1 << 2;
    }
}

impl HardwareBufferUsage {
    /// The wgpu usages needed to honor these buffer usages.
    ///
    /// Compositor hand-off is modelled as a copy out of the texture.
    #[must_use]
    pub fn texture_usages(self) -> wgpu::TextureUsages {
        let mut usages = wgpu::TextureUsages::empty();
        if self.contains(Self::FRAME_BUFFER_ATTACHMENT) {
            usages |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        if self.contains(Self::COMPOSITOR_OVERLAY) {
            usages |= wgpu::TextureUsages::COPY_SRC;
        }
        if self.contains(Self::SAMPLED_IMAGE) {
            usages |= wgpu::TextureUsages::TEXTURE_BINDING;
        }
        usages
    }
}

/// Dimensions of a hardware buffer in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Immutable description of the buffers backing a pool's texture sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HardwareBufferDescriptor {
    pub format: HardwareBufferFormat,
    pub size: Extent,
    pub usage: HardwareBufferUsage,
}

impl HardwareBufferDescriptor {
    /// Describes a buffer usable as a swapchain image of the given size.
    #[must_use]
    pub fn for_swapchain_image(width: u32, height: u32) -> Self {
        Self {
            format: HardwareBufferFormat::R8G8B8A8UNormInt,
            size: Extent::new(width, height),
            usage: HardwareBufferUsage::FRAME_BUFFER_ATTACHMENT
                | HardwareBufferUsage::COMPOSITOR_OVERLAY
                | HardwareBufferUsage::SAMPLED_IMAGE,
        }
    }

    /// Whether a buffer with this description can be allocated at all.
    ///
    /// Empty buffers cannot; whether the device has room is a separate
    /// question answered only by attempting the allocation.
    #[inline]
    #[must_use]
    pub fn is_allocatable(&self) -> bool {
        !self.size.is_empty()
    }

    /// Number of bytes a buffer with this description occupies.
    #[inline]
    #[must_use]
    pub fn allocation_size(&self) -> u64 {
        u64::from(self.size.width)
            * u64::from(self.size.height)
            * u64::from(self.format.bytes_per_pixel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapchain_descriptor_is_allocatable() {
        let desc = HardwareBufferDescriptor::for_swapchain_image(1920, 1080);
        assert!(desc.is_allocatable());
        assert_eq!(desc.allocation_size(), 1920 * 1080 * 4);
        assert!(desc.usage.contains(HardwareBufferUsage::FRAME_BUFFER_ATTACHMENT));
    }

    #[test]
    fn empty_descriptor_is_not_allocatable() {
        assert!(!HardwareBufferDescriptor::for_swapchain_image(0, 720).is_allocatable());
        assert!(!HardwareBufferDescriptor::for_swapchain_image(1280, 0).is_allocatable());
        assert!(!HardwareBufferDescriptor::default().is_allocatable());
    }

    #[test]
    fn usage_maps_to_wgpu_usages() {
        let desc = HardwareBufferDescriptor::for_swapchain_image(4, 4);
        let usages = desc.usage.texture_usages();
        assert!(usages.contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
        assert!(usages.contains(wgpu::TextureUsages::TEXTURE_BINDING));
        assert!(usages.contains(wgpu::TextureUsages::COPY_SRC));
        assert_eq!(
            HardwareBufferUsage::empty().texture_usages(),
            wgpu::TextureUsages::empty()
        );
        assert_eq!(desc.format.texture_format(), wgpu::TextureFormat::Rgba8Unorm);
    }
}
