//! Core functionality for lifo-stack
//!
//! Traits shared by the allocator family and common size constants.

pub mod traits;
pub mod types;

pub use crate::error::{MemoryError, MemoryResult};
pub use traits::{BasicMemoryUsage, MemoryUsage, Resettable, StatisticsProvider};
pub use types::*;
