//! Backing storage for the stack allocator
//!
//! The allocator is generic over where its bytes live:
//! - [`HeapBuffer`] - acquired from the global allocator and released on drop
//! - [`BorrowedBuffer`] - caller-supplied storage the allocator never frees
//! - [`InlineBuffer`] - a fixed-size array embedded in the allocator value
//!
//! All three hand out a pointer through `&self`, so they keep their bytes
//! behind `UnsafeCell`.
//!
//! # Safety
//!
//! [`StackBuffer`] is sealed. Every implementation guarantees that
//! `as_non_null()` is valid for reads and writes of `capacity()` bytes while
//! the buffer is alive, and that writes through it are permitted from a
//! shared reference. For [`InlineBuffer`] the pointer changes when the value
//! moves; the allocator only keeps offsets, never addresses.

use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::error::{MemoryError, MemoryResult};

mod private {
    /// Sealing trait; cannot be named outside this module
    pub trait Sealed {}

    impl Sealed for super::HeapBuffer {}
    impl Sealed for super::BorrowedBuffer<'_> {}
    impl<const N: usize> Sealed for super::InlineBuffer<N> {}
}

/// Storage a [`StackAllocator`](super::StackAllocator) carves allocations from
///
/// This trait is sealed; it can be used as a bound but not implemented
/// outside this crate.
pub trait StackBuffer: private::Sealed {
    /// Pointer to the first byte of the buffer
    fn as_non_null(&self) -> NonNull<u8>;

    /// Size of the buffer in bytes
    fn capacity(&self) -> usize;

    /// Whether dropping the buffer releases its storage
    fn owns_storage(&self) -> bool;
}

// ============================================================================
// Heap storage
// ============================================================================

/// Heap-allocated buffer owned by the allocator
pub struct HeapBuffer {
    memory: Box<[UnsafeCell<u8>]>,
}

impl HeapBuffer {
    /// Acquires a zeroed buffer of exactly `capacity` bytes
    pub fn try_new(capacity: usize) -> MemoryResult<Self> {
        let mut memory: Vec<UnsafeCell<u8>> = Vec::new();
        memory
            .try_reserve_exact(capacity)
            .map_err(|_| MemoryError::allocation_failed(capacity, 1))?;
        memory.resize_with(capacity, || UnsafeCell::new(0));

        Ok(Self {
            memory: memory.into_boxed_slice(),
        })
    }

    /// Adopts an existing boxed slice without copying it
    pub fn from_boxed_slice(memory: Box<[u8]>) -> Self {
        let len = memory.len();
        let raw = Box::into_raw(memory);
        // SAFETY: Reinterpreting Box<[u8]> as Box<[UnsafeCell<u8>]>.
        // - UnsafeCell<u8> is repr(transparent) over u8, same size and alignment
        // - Ownership moves through into_raw/from_raw exactly once
        // - Length is preserved
        let memory = unsafe {
            Box::from_raw(ptr::slice_from_raw_parts_mut(
                raw.cast::<UnsafeCell<u8>>(),
                len,
            ))
        };

        Self { memory }
    }
}

impl StackBuffer for HeapBuffer {
    #[inline]
    fn as_non_null(&self) -> NonNull<u8> {
        NonNull::from(&*self.memory).cast::<u8>()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.memory.len()
    }

    fn owns_storage(&self) -> bool {
        true
    }
}

// ============================================================================
// Borrowed storage
// ============================================================================

/// Caller-supplied buffer; the allocator never frees it
///
/// The lifetime ties the allocator to the storage, so the storage cannot be
/// touched or dropped while the allocator is alive.
pub struct BorrowedBuffer<'a> {
    ptr: NonNull<u8>,
    len: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> BorrowedBuffer<'a> {
    /// Adopts `storage` for the duration of the borrow
    pub fn new(storage: &'a mut [u8]) -> Self {
        let len = storage.len();
        Self {
            ptr: NonNull::from(storage).cast::<u8>(),
            len,
            _marker: PhantomData,
        }
    }
}

// SAFETY: BorrowedBuffer is an exclusive borrow of a byte slice.
// - Same ownership shape as &'a mut [u8], which is Send
// - No thread-local state
unsafe impl Send for BorrowedBuffer<'_> {}

impl StackBuffer for BorrowedBuffer<'_> {
    #[inline]
    fn as_non_null(&self) -> NonNull<u8> {
        self.ptr
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.len
    }

    fn owns_storage(&self) -> bool {
        false
    }
}

// ============================================================================
// Inline storage
// ============================================================================

/// Fixed-size buffer stored inline in the allocator value
pub struct InlineBuffer<const N: usize> {
    bytes: UnsafeCell<[u8; N]>,
}

impl<const N: usize> InlineBuffer<N> {
    /// Capacity in bytes, known at compile time
    pub const CAPACITY: usize = N;

    /// Creates a zeroed inline buffer
    pub const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; N]),
        }
    }
}

impl<const N: usize> Default for InlineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StackBuffer for InlineBuffer<N> {
    #[inline]
    fn as_non_null(&self) -> NonNull<u8> {
        NonNull::from(&self.bytes).cast::<u8>()
    }

    #[inline]
    fn capacity(&self) -> usize {
        N
    }

    fn owns_storage(&self) -> bool {
        true
    }
}
