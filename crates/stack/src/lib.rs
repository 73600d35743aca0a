//! # lifo-stack
//!
//! Fixed-capacity LIFO stack allocator with self-describing allocations.
//!
//! Every allocation is followed by a small trailer record that stores the
//! allocation's total span (leading padding, payload, trailing padding and
//! the record itself). Freeing pops the most recent allocation by reading
//! that record, so the caller never has to remember sizes.
//!
//! ## Quick Start
//!
//! ```rust
//! use lifo_stack::prelude::*;
//!
//! # fn main() -> lifo_stack::Result<()> {
//! let stack = StackAllocator::new(4096)?;
//!
//! let header = stack.allocate(16, 64)?;
//! let scratch = stack.allocate_tight(10)?;
//! assert!(stack.owns(header.as_ptr()));
//! assert!(stack.owns(scratch.as_ptr()));
//!
//! assert!(stack.free()); // scratch
//! assert!(stack.free()); // header
//! assert!(!stack.free());
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage
//!
//! - [`StackAllocator::new`] - heap buffer owned by the allocator
//! - [`StackAllocator::from_buffer`] - caller-supplied `&mut [u8]`
//! - [`InlineStackAllocator::new_inline`] - `N` bytes embedded in the value
//!
//! ## Features
//!
//! - `logging` (default): structured `tracing` events for construction,
//!   allocation, release and errors
//!
//! ## Thread Safety
//!
//! Allocators mutate through `&self` and are therefore `!Sync`. They are
//! `Send`, so an allocator can be handed to another thread as a whole.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rust_2018_idioms)]
#![allow(unsafe_code)]

// Error types
pub mod error;

// Core modules
pub mod allocator;
pub mod core;
pub mod utils;

// Re-export core types for convenience
pub use crate::error::{MemoryError, MemoryResult, Result};

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Core traits
    pub use crate::core::traits::{MemoryUsage, Resettable, StatisticsProvider};

    // Error types
    pub use crate::error::{MemoryError, MemoryResult, Result};

    // Allocator types
    pub use crate::allocator::{
        AllocError, AllocResult, AllocatorStats, InlineStackAllocator, StackAllocator,
        StackConfig, StackFrame, StackMarker,
    };

    pub use crate::with_stack_frame;
}

// Re-export allocator types at crate root for convenience
pub use crate::allocator::{
    AllocError, AllocResult, InlineStackAllocator, RECORD_SIZE, StackAllocator, StackConfig,
    StackFrame, StackMarker,
};
