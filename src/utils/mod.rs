//! Utility Module
//!
//! - [`time`]: clocks used to stamp and age pool entries

pub mod time;

pub use time::{Clock, ManualClock, SystemClock};
