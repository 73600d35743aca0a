//! Trailer record written after every stack allocation
//!
//! Each allocation occupies a span laid out as:
//!
//! ```text
//! cursor                                                   new cursor
//!   |-- padding --|-- payload --|-- padding --|-- record --|
//!   <-------------------------- span ------------------->
//! ```
//!
//! The record stores the span, so `free()` can step back from the cursor to
//! the start of the most recent allocation without being told its size.
//! Records form an implicit chain read backwards through the buffer.

use core::mem::{align_of, size_of};
use core::ptr::NonNull;

/// Size of a trailer record in bytes
pub const RECORD_SIZE: usize = size_of::<AllocationRecord>();

/// Alignment the aligned allocation path gives to trailer records
pub const RECORD_ALIGN: usize = align_of::<AllocationRecord>();

/// Bookkeeping trailer holding the total byte span of one allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct AllocationRecord {
    span: usize,
}

impl AllocationRecord {
    pub(crate) const fn new(span: usize) -> Self {
        Self { span }
    }

    pub(crate) const fn span(self) -> usize {
        self.span
    }

    /// Writes the record at `at`
    ///
    /// Tight allocations place records at arbitrary offsets, so the store is
    /// unaligned.
    ///
    /// # Safety
    /// `at` must be valid for writes of `RECORD_SIZE` bytes.
    #[inline]
    pub(crate) unsafe fn write_to(self, at: NonNull<u8>) {
        // SAFETY: caller guarantees RECORD_SIZE writable bytes at `at`
        unsafe { at.cast::<Self>().write_unaligned(self) };
    }

    /// Reads the record that ends at `end`
    ///
    /// # Safety
    /// `[end - RECORD_SIZE, end)` must be readable and inside one buffer.
    #[inline]
    pub(crate) unsafe fn read_before(end: NonNull<u8>) -> Self {
        // SAFETY: caller guarantees the RECORD_SIZE bytes before `end` are in bounds
        unsafe { end.sub(RECORD_SIZE).cast::<Self>().read_unaligned() }
    }
}
