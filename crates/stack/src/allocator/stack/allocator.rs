//! Main stack allocator implementation
//!
//! # Safety
//!
//! This module implements a single-threaded LIFO stack allocator:
//! - The buffer is owned by a [`StackBuffer`] that permits writes through `&self`
//! - The cursor is a byte offset in a `Cell`, which makes the allocator `!Sync`
//! - Every allocation ends with an [`AllocationRecord`] holding its span
//! - Only the most recent allocation can be freed (stack discipline)
//!
//! ## Invariants
//!
//! - `0 <= cursor <= capacity`
//! - `[0, cursor)` is a sequence of complete spans laid end to end, each
//!   ending with its record; `[cursor, capacity)` is free
//! - Error paths never touch the cursor
//! - Payload and record pointers are derived from the buffer pointer with
//!   `add`, so they keep the buffer's provenance
//!
//! Alignment is computed against real addresses, so padding depends on where
//! the buffer lives. Offsets are what get stored, which keeps the allocator
//! movable when it holds inline storage.

use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::mem::{align_of, size_of};
use core::ptr::{self, NonNull};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

use super::buffer::{BorrowedBuffer, HeapBuffer, StackBuffer};
use super::record::{AllocationRecord, RECORD_ALIGN, RECORD_SIZE};
use super::{StackConfig, StackMarker};
use crate::allocator::stats::StatsCounters;
use crate::allocator::{AllocError, AllocResult, AllocatorStats};
use crate::core::size;
use crate::core::traits::{MemoryUsage, Resettable, StatisticsProvider};
use crate::utils::{checked_align_up, padding_needed};

/// Offsets of a planned allocation, relative to the start of the buffer
#[derive(Debug, Clone, Copy)]
struct Placement {
    payload: usize,
    record: usize,
    end: usize,
}

/// Stack allocator that supports LIFO allocation and deallocation
///
/// The allocator preallocates one buffer and serves allocations from it in
/// order. After each payload it writes a trailer recording the allocation's
/// total span, which is what lets [`free`](Self::free) release the most
/// recent allocation without a size argument.
///
/// # Memory Layout
/// ```text
/// [start][pad|alloc1|pad|rec][pad|alloc2|pad|rec][cursor]----[free]----[end]
///        <------------ allocated ------------->          <-- available -->
/// ```
///
/// Deallocations must happen in reverse order: alloc2, then alloc1.
///
/// The allocator never runs destructors. Values placed with
/// [`allocate_value`](Self::allocate_value) must be dropped by the caller
/// (for example with `ptr::drop_in_place`) before their span is freed.
pub struct StackAllocator<B: StackBuffer = HeapBuffer> {
    /// Backing storage
    buffer: B,

    /// Offset of the first free byte
    cursor: Cell<usize>,

    /// Configuration
    config: StackConfig,

    /// Statistics (only updated if enabled)
    stats: StatsCounters,
}

impl StackAllocator<HeapBuffer> {
    /// Creates a new stack allocator with default configuration
    pub fn new(capacity: usize) -> AllocResult<Self> {
        Self::with_config(capacity, StackConfig::default())
    }

    /// Creates a new stack allocator with custom configuration
    pub fn with_config(capacity: usize, config: StackConfig) -> AllocResult<Self> {
        if capacity == 0 {
            return Err(AllocError::invalid_config("capacity cannot be zero"));
        }

        let buffer = HeapBuffer::try_new(capacity)?;
        Ok(Self::from_parts(buffer, config))
    }

    /// Creates a stack allocator from a pre-allocated boxed slice
    ///
    /// The allocator takes ownership of the slice and releases it on drop.
    #[must_use]
    pub fn from_boxed_slice(memory: Box<[u8]>) -> Self {
        Self::from_parts(HeapBuffer::from_boxed_slice(memory), StackConfig::default())
    }

    /// Creates a production-optimized stack allocator
    pub fn production(capacity: usize) -> AllocResult<Self> {
        Self::with_config(capacity, StackConfig::production())
    }

    /// Creates a debug-optimized stack allocator
    pub fn debug(capacity: usize) -> AllocResult<Self> {
        Self::with_config(capacity, StackConfig::debug())
    }

    /// Creates a performance-optimized stack allocator
    pub fn performance(capacity: usize) -> AllocResult<Self> {
        Self::with_config(capacity, StackConfig::performance())
    }

    /// Convenience constructors
    pub fn small() -> AllocResult<Self> {
        Self::new(size::SMALL)
    }
    pub fn medium() -> AllocResult<Self> {
        Self::new(size::MEDIUM)
    }
    pub fn large() -> AllocResult<Self> {
        Self::new(size::LARGE)
    }
}

impl<'a> StackAllocator<BorrowedBuffer<'a>> {
    /// Creates a stack allocator over caller-supplied storage
    ///
    /// The storage is adopted, not owned: dropping the allocator leaves it
    /// untouched, and the borrow keeps it alive for as long as the allocator.
    pub fn from_buffer(storage: &'a mut [u8]) -> Self {
        Self::from_buffer_with_config(storage, StackConfig::default())
    }

    /// Creates a stack allocator over caller-supplied storage with custom
    /// configuration
    pub fn from_buffer_with_config(storage: &'a mut [u8], config: StackConfig) -> Self {
        Self::from_parts(BorrowedBuffer::new(storage), config)
    }
}

impl<B: StackBuffer> StackAllocator<B> {
    pub(super) fn from_parts(buffer: B, config: StackConfig) -> Self {
        #[cfg(feature = "logging")]
        debug!(
            capacity = buffer.capacity(),
            owned = buffer.owns_storage(),
            track_stats = config.track_stats,
            "created stack allocator"
        );

        Self {
            buffer,
            cursor: Cell::new(0),
            config,
            stats: StatsCounters::default(),
        }
    }

    /// Returns the total capacity of the allocator
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns the number of bytes in use, padding and records included
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Returns the number of bytes still free
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity() - self.cursor.get()
    }

    /// Returns `true` if nothing is allocated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor.get() == 0
    }

    /// Returns a pointer to the first byte of the buffer
    #[inline]
    pub fn as_ptr(&self) -> NonNull<u8> {
        self.buffer.as_non_null()
    }

    /// Returns the configuration
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Checks if `ptr` points into the buffer
    ///
    /// This is an address range test only. It does not check that `ptr` came
    /// from this allocator or that its allocation is still live.
    pub fn owns<T: ?Sized>(&self, ptr: *const T) -> bool {
        let start = self.as_ptr().as_ptr().addr();
        let addr = ptr.cast::<u8>().addr();
        addr >= start && addr - start < self.capacity()
    }

    // ------------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------------

    /// Allocates `size` bytes aligned to `alignment`
    ///
    /// The payload is placed at the first suitably aligned position at or
    /// after the cursor, and the trailer record at the first record-aligned
    /// position after the payload. Both paddings count towards the
    /// allocation's span.
    ///
    /// # Errors
    /// - [`AllocError::CapacityExceeded`] if the payload or its record does
    ///   not fit in the remaining space
    /// - [`AllocError::InvalidAlignment`] if `alignment` is not a power of two
    ///
    /// The cursor is unchanged on error.
    pub fn allocate(&self, alignment: usize, size: usize) -> AllocResult<NonNull<u8>> {
        if !alignment.is_power_of_two() {
            return Err(AllocError::invalid_alignment(alignment));
        }

        match self.place_aligned(alignment, size) {
            Some(placement) => Ok(self.commit(placement, size, alignment)),
            None => Err(self.capacity_exceeded(size, alignment)),
        }
    }

    /// Allocates a block described by `layout`
    pub fn allocate_layout(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        self.allocate(layout.align(), layout.size())
    }

    /// Allocates `size` bytes with no alignment padding at all
    ///
    /// Needs exactly `size + RECORD_SIZE` free bytes. The record is written
    /// immediately after the payload, possibly unaligned. Use this only where
    /// byte alignment is enough for the payload.
    ///
    /// # Errors
    /// - [`AllocError::CapacityExceeded`] if the remaining space is too small
    /// - [`AllocError::SizeOverflow`] if `size + RECORD_SIZE` overflows
    pub fn allocate_tight(&self, size: usize) -> AllocResult<NonNull<u8>> {
        let cursor = self.cursor.get();
        let span = size
            .checked_add(RECORD_SIZE)
            .ok_or_else(|| AllocError::size_overflow("tight allocation span"))?;

        if span > self.remaining_capacity() {
            return Err(self.capacity_exceeded(size, 1));
        }

        let placement = Placement {
            payload: cursor,
            record: cursor + size,
            end: cursor + span,
        };
        Ok(self.commit(placement, size, 1))
    }

    /// Moves `value` into a new aligned allocation
    ///
    /// On error `value` is dropped without being written anywhere.
    pub fn allocate_value<T>(&self, value: T) -> AllocResult<NonNull<T>> {
        let ptr = self.allocate(align_of::<T>(), size_of::<T>())?.cast::<T>();
        // SAFETY: Writing a T into freshly reserved space.
        // - allocate returned size_of::<T>() bytes aligned to align_of::<T>()
        // - Nothing ran between the reservation and this write, so the range
        //   is still live and overlaps no other allocation
        unsafe { ptr.write(value) };
        Ok(ptr)
    }

    /// Builds a `T` with `init` and moves it into a new aligned allocation
    ///
    /// `init` runs before any space is reserved, so it may itself allocate
    /// from or free on this allocator.
    pub fn allocate_with<T, F>(&self, init: F) -> AllocResult<NonNull<T>>
    where
        F: FnOnce() -> T,
    {
        let value = init();
        self.allocate_value(value)
    }

    /// Moves `value` into a new tight allocation
    ///
    /// The value is written with an unaligned store. The returned pointer is
    /// only aligned for `T` if the cursor happened to be; otherwise read it
    /// back with `read_unaligned`.
    pub fn allocate_tight_value<T>(&self, value: T) -> AllocResult<NonNull<T>> {
        let ptr = self.allocate_tight(size_of::<T>())?.cast::<T>();
        // SAFETY: Writing a T into freshly reserved, possibly unaligned space.
        // - allocate_tight returned size_of::<T>() writable bytes
        // - write_unaligned has no alignment requirement
        unsafe { ptr.write_unaligned(value) };
        Ok(ptr)
    }

    /// Computes offsets for an aligned allocation, or `None` if it does not fit
    fn place_aligned(&self, alignment: usize, size: usize) -> Option<Placement> {
        let capacity = self.capacity();
        let cursor = self.cursor.get();
        let base = self.as_ptr().as_ptr().addr();

        // base + offset stays in the address space for offsets <= capacity
        let payload = checked_align_up(base + cursor, alignment)? - base;
        let payload_end = payload.checked_add(size)?;
        if payload_end > capacity {
            return None;
        }

        let record = payload_end + padding_needed(base + payload_end, RECORD_ALIGN);
        let end = record.checked_add(RECORD_SIZE)?;
        if end > capacity {
            return None;
        }

        Some(Placement {
            payload,
            record,
            end,
        })
    }

    /// Writes the record for `placement` and advances the cursor
    fn commit(&self, placement: Placement, size: usize, alignment: usize) -> NonNull<u8> {
        let cursor = self.cursor.get();
        let span = placement.end - cursor;
        let base = self.as_ptr();

        // SAFETY: Initializing the reserved span.
        // - placement.end <= capacity, so payload..payload + size and
        //   record..record + RECORD_SIZE are inside the buffer
        // - Both ranges lie at or after the cursor, in free space
        // - The buffer permits writes through &self (StackBuffer contract)
        let payload = unsafe {
            let payload = base.add(placement.payload);
            if let Some(pattern) = self.config.alloc_pattern {
                ptr::write_bytes(payload.as_ptr(), pattern, size);
            }
            AllocationRecord::new(span).write_to(base.add(placement.record));
            payload
        };

        self.cursor.set(placement.end);

        if self.config.track_stats {
            self.stats.record_allocation(span, placement.end);
        }

        #[cfg(feature = "logging")]
        trace!(
            offset = placement.payload,
            size,
            alignment,
            span,
            "stack allocate"
        );
        #[cfg(not(feature = "logging"))]
        let _ = alignment;

        payload
    }

    fn capacity_exceeded(&self, size: usize, alignment: usize) -> AllocError {
        if self.config.track_stats {
            self.stats.record_failure();
        }
        AllocError::capacity_exceeded(size, alignment, self.remaining_capacity())
    }

    // ------------------------------------------------------------------------
    // Release
    // ------------------------------------------------------------------------

    /// Frees the most recent allocation
    ///
    /// Returns `false` if the allocator is empty, which is not an error. No
    /// destructor runs on the released memory.
    ///
    /// A damaged trailer record (see [`try_free`](Self::try_free)) also
    /// yields `false` and leaves the cursor where it was.
    pub fn free(&self) -> bool {
        self.try_free().unwrap_or(false)
    }

    /// Frees the most recent allocation, reporting a damaged trailer
    ///
    /// # Errors
    /// [`AllocError::Corruption`] if the record before the cursor holds a
    /// span that cannot be valid, which happens when a caller wrote past the
    /// end of its payload.
    pub fn try_free(&self) -> AllocResult<bool> {
        let cursor = self.cursor.get();
        if cursor == 0 {
            return Ok(false);
        }

        let span = self.span_ending_at(cursor)?;
        self.release_to(cursor - span, 1);

        #[cfg(feature = "logging")]
        trace!(offset = cursor - span, span, "stack free");

        Ok(true)
    }

    /// Reads and validates the span of the allocation ending at `end`
    fn span_ending_at(&self, end: usize) -> AllocResult<usize> {
        if end < RECORD_SIZE || end > self.capacity() {
            return Err(AllocError::corruption(
                "stack allocator",
                &format!("allocation end {end} cannot hold a trailer record"),
            ));
        }

        // SAFETY: Reading the trailer before `end`.
        // - RECORD_SIZE <= end <= capacity, so the record is inside the buffer
        // - Every buffer variant starts fully initialized
        let record = unsafe { AllocationRecord::read_before(self.as_ptr().add(end)) };
        let span = record.span();

        if span < RECORD_SIZE || span > end {
            return Err(AllocError::corruption(
                "stack allocator",
                &format!(
                    "trailer at offset {} records span {span}",
                    end - RECORD_SIZE
                ),
            ));
        }

        Ok(span)
    }

    /// Moves the cursor back to `position`, releasing `released` allocations
    fn release_to(&self, position: usize, released: usize) {
        let cursor = self.cursor.get();
        debug_assert!(position <= cursor);

        if let Some(pattern) = self.config.dealloc_pattern {
            // SAFETY: Scrubbing the released span.
            // - position <= cursor <= capacity, so the range is inside the buffer
            // - The range is no longer handed out to anyone
            unsafe {
                ptr::write_bytes(
                    self.as_ptr().add(position).as_ptr(),
                    pattern,
                    cursor - position,
                );
            }
        }

        self.cursor.set(position);

        if self.config.track_stats {
            self.stats.record_deallocations(released);
        }
    }

    /// Starts allocating from the beginning of the buffer again
    ///
    /// Every pointer handed out so far becomes dangling. Nothing is dropped
    /// and no bytes are scrubbed.
    pub fn reset(&self) {
        self.cursor.set(0);

        if self.config.track_stats {
            self.stats.record_reset();
        }

        #[cfg(feature = "logging")]
        debug!(capacity = self.capacity(), "stack allocator reset");
    }

    // ------------------------------------------------------------------------
    // Markers
    // ------------------------------------------------------------------------

    /// Creates a marker at the current stack position
    ///
    /// This marker can be used later to rewind the stack to this position,
    /// releasing all allocations made after this point.
    pub fn mark(&self) -> StackMarker {
        StackMarker {
            position: self.cursor.get(),
        }
    }

    /// Rewinds the stack to a previous marker position
    ///
    /// Walks the trailer chain back from the cursor and accepts the marker
    /// only if the walk lands exactly on it. A marker that was freed past is
    /// rejected. Markers carry only an offset, so one taken from another
    /// allocator is accepted whenever that offset is also an allocation
    /// boundary here.
    ///
    /// # Errors
    /// - [`AllocError::InvalidMarker`] if the marker is not an allocation
    ///   boundary at or below the cursor
    /// - [`AllocError::Corruption`] if a trailer on the way is damaged
    ///
    /// The cursor is unchanged on error.
    pub fn rewind(&self, marker: StackMarker) -> AllocResult<()> {
        let cursor = self.cursor.get();
        let target = marker.position;

        if target > cursor {
            return Err(AllocError::invalid_marker(target, cursor));
        }

        let mut position = cursor;
        let mut released = 0;
        while position > target {
            position -= self.span_ending_at(position)?;
            released += 1;
        }

        if position != target {
            return Err(AllocError::invalid_marker(target, cursor));
        }

        if released > 0 {
            self.release_to(target, released);
        }

        #[cfg(feature = "logging")]
        trace!(offset = target, released, "stack rewind");

        Ok(())
    }

    /// Counts the live allocations by walking the trailer chain
    pub fn allocation_count(&self) -> AllocResult<usize> {
        let mut position = self.cursor.get();
        let mut count = 0;
        while position > 0 {
            position -= self.span_ending_at(position)?;
            count += 1;
        }
        Ok(count)
    }
}

impl<B: StackBuffer> fmt::Debug for StackAllocator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackAllocator")
            .field("capacity", &self.capacity())
            .field("used", &self.used())
            .field("owns_storage", &self.buffer.owns_storage())
            .field("config", &self.config)
            .finish()
    }
}

impl<B: StackBuffer> MemoryUsage for StackAllocator<B> {
    fn used_memory(&self) -> usize {
        self.used()
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.remaining_capacity())
    }

    fn total_memory(&self) -> Option<usize> {
        Some(self.capacity())
    }
}

impl<B: StackBuffer> Resettable for StackAllocator<B> {
    fn reset(&self) {
        StackAllocator::reset(self);
    }
}

impl<B: StackBuffer> StatisticsProvider for StackAllocator<B> {
    fn statistics(&self) -> AllocatorStats {
        self.stats.snapshot(self.used())
    }

    fn reset_statistics(&self) {
        self.stats.clear(self.used());
    }

    fn statistics_enabled(&self) -> bool {
        self.config.track_stats
    }
}
