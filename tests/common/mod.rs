//! Shared fixtures: an in-memory resource context whose allocator can be
//! told to run out of capacity or to produce broken texture sources.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use swapchain_pool::{
    HardwareBufferDescriptor, PoolError, ResourceContext, Result, TextureAllocator, TextureSource,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn swapchain_desc() -> HardwareBufferDescriptor {
    HardwareBufferDescriptor::for_swapchain_image(64, 32)
}

#[derive(Debug)]
pub struct MockTexture {
    pub id: usize,
    desc: HardwareBufferDescriptor,
    valid: bool,
}

impl TextureSource for MockTexture {
    fn descriptor(&self) -> &HardwareBufferDescriptor {
        &self.desc
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

#[derive(Debug)]
pub struct MockAllocator {
    created: AtomicUsize,
    remaining: AtomicUsize,
    produce_invalid: AtomicBool,
}

impl TextureAllocator for MockAllocator {
    type Source = MockTexture;

    fn create_texture_source(&self, desc: &HardwareBufferDescriptor) -> Result<MockTexture> {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| PoolError::exhausted("mock allocator out of capacity"))?;
        let id = self.created.fetch_add(1, Ordering::AcqRel);
        Ok(MockTexture {
            id,
            desc: *desc,
            valid: !self.produce_invalid.load(Ordering::Acquire),
        })
    }
}

#[derive(Debug)]
pub struct MockContext {
    allocator: MockAllocator,
    alive: AtomicBool,
}

impl MockContext {
    pub fn new() -> Arc<Self> {
        Self::with_capacity(usize::MAX)
    }

    /// A context whose allocator creates at most `capacity` textures.
    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            allocator: MockAllocator {
                created: AtomicUsize::new(0),
                remaining: AtomicUsize::new(capacity),
                produce_invalid: AtomicBool::new(false),
            },
            alive: AtomicBool::new(true),
        })
    }

    pub fn created(&self) -> usize {
        self.allocator.created.load(Ordering::Acquire)
    }

    pub fn set_capacity(&self, capacity: usize) {
        self.allocator.remaining.store(capacity, Ordering::Release);
    }

    pub fn produce_invalid(&self, invalid: bool) {
        self.allocator
            .produce_invalid
            .store(invalid, Ordering::Release);
    }

    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl ResourceContext for MockContext {
    type Allocator = MockAllocator;

    fn resource_allocator(&self) -> Option<&MockAllocator> {
        self.alive
            .load(Ordering::Acquire)
            .then_some(&self.allocator)
    }
}
