//! Error Types
//!
//! This module defines the error types used throughout the pool.
//!
//! # Overview
//!
//! The main error type [`PoolError`] covers every way a texture source can
//! fail to be produced:
//! - The owning resource context was torn down
//! - The allocator ran out of device memory or handles
//! - The allocator produced a texture source that is not usable
//! - The buffer descriptor cannot be allocated at all
//!
//! Misuse of the pool (pushing a foreign or already pooled texture source)
//! is a caller contract violation and has no variant here.
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, PoolError>`.
//!
//! ```rust,ignore
//! use swapchain_pool::errors::{PoolError, Result};
//!
//! fn acquire(pool: &Pool) -> Result<()> {
//!     let texture = pool.try_pop()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for texture source acquisition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The resource context was destroyed or can no longer hand out an allocator.
    #[error("Resource context is no longer available")]
    ContextLost,

    /// The allocator could not create a new texture source.
    #[error("Resource exhausted: {reason}")]
    ResourceExhausted {
        /// What the allocator ran out of
        reason: String,
    },

    /// The allocator returned a texture source that reports itself invalid.
    #[error("Allocator produced an invalid texture source")]
    InvalidTextureSource,

    /// The hardware buffer descriptor describes an empty buffer.
    #[error("Hardware buffer of size {width}x{height} is not allocatable")]
    NotAllocatable {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },
}

impl PoolError {
    /// Shorthand for [`PoolError::ResourceExhausted`].
    #[must_use]
    pub fn exhausted(reason: impl Into<String>) -> Self {
        PoolError::ResourceExhausted {
            reason: reason.into(),
        }
    }
}

/// Alias for `Result<T, PoolError>`.
pub type Result<T> = std::result::Result<T, PoolError>;
