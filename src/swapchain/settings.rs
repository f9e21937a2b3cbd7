//! Texture Pool Settings
//!
//! Bounds applied by a [`BufferTexturePool`](super::BufferTexturePool) to the
//! texture sources it keeps cached.
//!
//! ```rust,ignore
//! use swapchain_pool::swapchain::TexturePoolSettings;
//! use std::time::Duration;
//!
//! // Triple buffering, with a longer grace period for idle images
//! let settings = TexturePoolSettings::default()
//!     .with_max_entries(3)
//!     .with_max_entry_age(Duration::from_secs(2));
//! ```

use crate::utils::time::Duration;

/// Default number of cached texture sources.
pub const DEFAULT_MAX_ENTRIES: usize = 2;

/// Default time a texture source may sit idle in the pool.
pub const DEFAULT_MAX_ENTRY_AGE: Duration = Duration::from_millis(1000);

/// Cache bounds of a texture pool. Fixed once the pool is built.
///
/// # Fields
///
/// | Field           | Description                                   | Default   |
/// |-----------------|-----------------------------------------------|-----------|
/// | `max_entries`   | Texture sources kept after a GC pass          | `2`       |
/// | `max_entry_age` | Longest idle time that survives a GC pass     | `1000 ms` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexturePoolSettings {
    /// Maximum number of entries that remain cached after a GC pass.
    ///
    /// Zero is accepted and turns the pool into a pass-through: every
    /// pushed texture source is dropped immediately.
    pub max_entries: usize,

    /// Maximum duration an entry may stay idle in the pool.
    ///
    /// Idle time is measured from the moment the texture source was pushed
    /// back, not from its creation.
    pub max_entry_age: Duration,
}

impl Default for TexturePoolSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_entry_age: DEFAULT_MAX_ENTRY_AGE,
        }
    }
}

impl TexturePoolSettings {
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    #[must_use]
    pub fn with_max_entry_age(mut self, max_entry_age: Duration) -> Self {
        self.max_entry_age = max_entry_age;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_double_buffering() {
        let settings = TexturePoolSettings::default();
        assert_eq!(settings.max_entries, 2);
        assert_eq!(settings.max_entry_age, Duration::from_secs(1));
    }

    #[test]
    fn builders_override_single_fields() {
        let settings = TexturePoolSettings::default().with_max_entries(5);
        assert_eq!(settings.max_entries, 5);
        assert_eq!(settings.max_entry_age, DEFAULT_MAX_ENTRY_AGE);
    }
}
