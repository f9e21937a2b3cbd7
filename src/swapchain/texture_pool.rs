//! Swapchain Texture Pool
//!
//! Keeps a bounded cache of buffer-backed texture sources that a swapchain
//! cycles through as presentation images. Allocating and tearing down such
//! buffers is expensive, so images returned by the presenter are cached for
//! a short while and handed out again.
//!
//! # Design
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                 BufferTexturePool<C>                      │
//! │                                                           │
//! │  pool: Mutex<VecDeque<PoolEntry>>                         │
//! │        front = oldest ─────────────── back = newest       │
//! │                                                           │
//! │  pop()         take from back, else create (unlocked)     │
//! │  push(tex)     append at back, then GC                    │
//! │  perform_gc()  GC only                                    │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Cache Policy
//!
//! - Reuse is LIFO: the most recently returned image is the one whose GPU
//!   work is most likely to have already settled.
//! - A GC pass evicts from the front while the pool holds more than
//!   `max_entries` or the front entry has been idle for longer than
//!   `max_entry_age`, and stops at the first entry that violates neither.
//! - GC runs on every push and on explicit [`BufferTexturePool::perform_gc`]
//!   calls, never on pop.
//!
//! # Thread Safety
//!
//! All operations take `&self`. A single mutex guards the entry sequence and
//! is held only while the sequence is edited: creating a new texture source
//! and dropping evicted ones both happen after it is released.
//!
//! Texture sources are shared through [`Arc`]; a caller may keep one past the
//! pool's destruction.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::errors::{PoolError, Result};
use crate::swapchain::context::{ResourceContext, SourceOf, TextureAllocator, TextureSource};
use crate::swapchain::descriptor::HardwareBufferDescriptor;
use crate::swapchain::settings::TexturePoolSettings;
use crate::utils::time::{Clock, Instant, SystemClock};

/// A cached texture source together with the moment it was returned.
struct PoolEntry<T> {
    last_access_time: Instant,
    item: Arc<T>,
}

impl<T> PoolEntry<T> {
    fn new(item: Arc<T>, now: Instant) -> Self {
        Self {
            last_access_time: now,
            item,
        }
    }
}

type Evicted<T> = SmallVec<[PoolEntry<T>; 4]>;

/// Bounded, thread-safe pool of texture sources for swapchain images.
///
/// The number of cached entries is capped by
/// [`max_entries`](TexturePoolSettings::max_entries) and, within that cap,
/// no entry survives a GC pass after idling longer than
/// [`max_entry_age`](TexturePoolSettings::max_entry_age).
///
/// If no cached entry is available a new texture source is created; the
/// only reason a valid pool fails to produce one is resource exhaustion.
///
/// # Caller Contract
///
/// Only texture sources popped from a pool may be pushed back into that same
/// pool, and each at most once per pop. This is not checked in release
/// builds.
pub struct BufferTexturePool<C: ResourceContext> {
    context: Weak<C>,
    desc: HardwareBufferDescriptor,
    settings: TexturePoolSettings,
    clock: Arc<dyn Clock>,
    is_valid: bool,
    pool: Mutex<VecDeque<PoolEntry<SourceOf<C>>>>,
}

impl<C: ResourceContext> BufferTexturePool<C> {
    /// Creates a new, empty pool.
    ///
    /// Nothing is allocated here. The pool is valid if `desc` is allocatable
    /// and `context` currently yields an allocator.
    #[must_use]
    pub fn new(
        context: Weak<C>,
        desc: HardwareBufferDescriptor,
        settings: TexturePoolSettings,
    ) -> Self {
        Self::with_clock(context, desc, settings, Arc::new(SystemClock))
    }

    /// Creates a pool that caches two entries for at most one second.
    #[must_use]
    pub fn with_defaults(context: Weak<C>, desc: HardwareBufferDescriptor) -> Self {
        Self::new(context, desc, TexturePoolSettings::default())
    }

    /// Creates a pool that stamps and ages entries with `clock`.
    #[must_use]
    pub fn with_clock(
        context: Weak<C>,
        desc: HardwareBufferDescriptor,
        settings: TexturePoolSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let is_valid = Self::check_validity(&context, &desc);
        // One slot past the cap: a push briefly overfills before GC.
        let capacity = settings.max_entries.saturating_add(1).min(16);
        Self {
            context,
            desc,
            settings,
            clock,
            is_valid,
            pool: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn check_validity(context: &Weak<C>, desc: &HardwareBufferDescriptor) -> bool {
        if !desc.is_allocatable() {
            log::error!(
                "Swapchain image of size {}x{} is not allocatable.",
                desc.size.width,
                desc.size.height
            );
            return false;
        }
        let Some(context) = context.upgrade() else {
            log::error!("Texture pool created for a context that is already gone.");
            return false;
        };
        if context.resource_allocator().is_none() {
            log::error!("Texture pool context has no resource allocator.");
            return false;
        }
        true
    }

    /// Whether the pool can create texture sources.
    ///
    /// Decided once at construction. A valid pool may still fail to create
    /// a texture source later because of resource exhaustion or because its
    /// context was torn down in the meantime.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Pops a texture source from the pool, creating one if the pool is empty.
    ///
    /// Returns `None` when creation fails. The failure is logged and not
    /// retried; use [`try_pop`](Self::try_pop) to inspect the cause.
    #[must_use]
    pub fn pop(&self) -> Option<Arc<SourceOf<C>>> {
        match self.try_pop() {
            Ok(texture) => Some(texture),
            Err(err) => {
                log::error!(
                    "Could not obtain swapchain texture source of size {}x{}: {err}",
                    self.desc.size.width,
                    self.desc.size.height
                );
                None
            }
        }
    }

    /// Like [`pop`](Self::pop), but reports why no texture source is available.
    pub fn try_pop(&self) -> Result<Arc<SourceOf<C>>> {
        let reused = self.pool.lock().pop_back();
        if let Some(entry) = reused {
            log::trace!("Reusing pooled swapchain texture source");
            return Ok(entry.item);
        }
        self.create_texture()
    }

    /// Returns a popped texture source to the pool and runs a GC pass.
    ///
    /// The texture source must have been popped from this pool and must not
    /// be in use anywhere else once returned.
    pub fn push(&self, texture: Arc<SourceOf<C>>) {
        let evicted = {
            let mut pool = self.pool.lock();
            debug_assert!(
                !pool.iter().any(|entry| Arc::ptr_eq(&entry.item, &texture)),
                "texture source pushed into the pool while already pooled"
            );
            let now = self.clock.now();
            pool.push_back(PoolEntry::new(texture, now));
            self.perform_gc_locked(&mut pool, now)
        };
        Self::release(evicted);
    }

    /// Runs a GC pass without returning anything to the pool.
    ///
    /// GC already happens on every push. Call this when pushes stop arriving
    /// for a while (dropped frames, paused rendering) so idle texture sources
    /// are still released.
    pub fn perform_gc(&self) {
        let evicted = {
            let mut pool = self.pool.lock();
            let now = self.clock.now();
            self.perform_gc_locked(&mut pool, now)
        };
        Self::release(evicted);
    }

    /// Number of texture sources currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.lock().is_empty()
    }

    /// The descriptor every texture source of this pool is created with.
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &HardwareBufferDescriptor {
        &self.desc
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &TexturePoolSettings {
        &self.settings
    }

    /// Unlinks entries from the oldest end of the pool while the size cap or
    /// age limit is violated.
    ///
    /// Entries are stamped under the lock, so stamps never decrease from
    /// front to back and the first compliant entry ends the scan.
    fn perform_gc_locked(
        &self,
        pool: &mut VecDeque<PoolEntry<SourceOf<C>>>,
        now: Instant,
    ) -> Evicted<SourceOf<C>> {
        let mut evicted = Evicted::<SourceOf<C>>::new();
        while let Some(oldest) = pool.front() {
            let over_capacity = pool.len() > self.settings.max_entries;
            let expired = now.saturating_duration_since(oldest.last_access_time)
                > self.settings.max_entry_age;
            if !over_capacity && !expired {
                break;
            }
            if let Some(entry) = pool.pop_front() {
                evicted.push(entry);
            }
        }
        evicted
    }

    // Buffer destruction can be expensive, so it happens outside the lock.
    fn release(evicted: Evicted<SourceOf<C>>) {
        if !evicted.is_empty() {
            log::debug!(
                "Evicted {} swapchain texture source(s) from pool",
                evicted.len()
            );
        }
        drop(evicted);
    }

    fn create_texture(&self) -> Result<Arc<SourceOf<C>>> {
        if !self.is_valid {
            return Err(if self.desc.is_allocatable() {
                PoolError::ContextLost
            } else {
                PoolError::NotAllocatable {
                    width: self.desc.size.width,
                    height: self.desc.size.height,
                }
            });
        }

        let context = self.context.upgrade().ok_or(PoolError::ContextLost)?;
        let allocator = context
            .resource_allocator()
            .ok_or(PoolError::ContextLost)?;

        let source = allocator.create_texture_source(&self.desc)?;
        if !source.is_valid() {
            return Err(PoolError::InvalidTextureSource);
        }

        log::trace!(
            "Created swapchain texture source {}x{}",
            self.desc.size.width,
            self.desc.size.height
        );
        Ok(Arc::new(source))
    }
}

impl<C: ResourceContext> Drop for BufferTexturePool<C> {
    fn drop(&mut self) {
        let remaining = self.pool.get_mut().len();
        if remaining > 0 {
            log::trace!("Releasing {remaining} pooled swapchain texture source(s)");
        }
    }
}

impl<C: ResourceContext> fmt::Debug for BufferTexturePool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferTexturePool")
            .field("desc", &self.desc)
            .field("settings", &self.settings)
            .field("is_valid", &self.is_valid)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
