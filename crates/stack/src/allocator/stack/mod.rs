//! Stack allocator for LIFO (Last In, First Out) memory management
//!
//! ## Modules
//! - `allocator` - Main `StackAllocator` implementation with LIFO semantics
//! - `buffer` - Heap, borrowed and inline backing storage
//! - `config` - Configuration variants (production, debug, performance)
//! - `frame` - RAII helper for automatic stack restoration
//! - `inline` - Compile-time capacity variant
//! - `marker` - Position markers for scoped deallocation
//! - `record` - Trailer record written after every allocation

pub mod allocator;
pub mod buffer;
pub mod config;
pub mod frame;
pub mod inline;
pub mod marker;
mod record;

pub use allocator::StackAllocator;
pub use buffer::{BorrowedBuffer, HeapBuffer, InlineBuffer, StackBuffer};
pub use config::StackConfig;
pub use frame::StackFrame;
pub use inline::InlineStackAllocator;
pub use marker::StackMarker;
pub use record::{RECORD_ALIGN, RECORD_SIZE};
