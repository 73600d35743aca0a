//! Allocator implementations and their bookkeeping

pub mod stack;
pub mod stats;

pub use stack::{
    BorrowedBuffer, HeapBuffer, InlineBuffer, InlineStackAllocator, RECORD_ALIGN, RECORD_SIZE,
    StackAllocator, StackBuffer, StackConfig, StackFrame, StackMarker,
};
pub use stats::AllocatorStats;

pub use crate::error::{AllocError, AllocResult};
