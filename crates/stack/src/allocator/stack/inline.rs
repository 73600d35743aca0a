//! Stack allocator with compile-time capacity and inline storage
//!
//! [`InlineStackAllocator<N>`] embeds its `N` byte buffer in the allocator
//! value itself, so it can live on the call stack or inside another struct
//! without touching the heap.
//!
//! Moving the allocator moves its buffer. Pointers handed out before the move
//! no longer point into the allocator afterwards; the allocator itself keeps
//! working because it tracks offsets, not addresses.

use super::buffer::InlineBuffer;
use super::{StackAllocator, StackConfig};

/// Stack allocator whose `N` byte buffer is stored inline
pub type InlineStackAllocator<const N: usize> = StackAllocator<InlineBuffer<N>>;

impl<const N: usize> StackAllocator<InlineBuffer<N>> {
    /// Creates an empty inline allocator with default configuration
    pub fn new_inline() -> Self {
        Self::inline_with_config(StackConfig::default())
    }

    /// Creates an empty inline allocator with custom configuration
    pub fn inline_with_config(config: StackConfig) -> Self {
        const { assert!(N > 0, "inline stack allocator needs a non-zero capacity") };
        Self::from_parts(InlineBuffer::new(), config)
    }
}

impl<const N: usize> Default for StackAllocator<InlineBuffer<N>> {
    fn default() -> Self {
        Self::new_inline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::stack::RECORD_SIZE;
    use crate::utils::is_aligned_ptr;

    #[test]
    fn test_inline_capacity_is_const() {
        let allocator = InlineStackAllocator::<256>::new_inline();
        assert_eq!(allocator.capacity(), 256);
        assert_eq!(allocator.remaining_capacity(), 256);
        assert!(allocator.is_empty());
    }

    #[test]
    fn test_inline_allocate_and_free() {
        let allocator = InlineStackAllocator::<128>::default();

        let ptr = allocator.allocate(16, 32).unwrap();
        assert!(is_aligned_ptr(ptr.as_ptr(), 16));
        assert!(allocator.owns(ptr.as_ptr()));

        let _ = allocator.allocate_tight(5).unwrap();
        assert!(allocator.free());
        assert!(allocator.free());
        assert!(!allocator.free());
        assert_eq!(allocator.remaining_capacity(), 128);
    }

    #[test]
    fn test_inline_exhaustion() {
        let allocator = InlineStackAllocator::<32>::inline_with_config(StackConfig::performance());
        let _ = allocator.allocate_tight(32 - RECORD_SIZE).unwrap();
        assert_eq!(allocator.remaining_capacity(), 0);

        let err = allocator.allocate_tight(0).unwrap_err();
        assert!(err.is_capacity_exceeded());
        assert_eq!(allocator.used(), 32);
    }

    #[test]
    fn test_inline_survives_move() {
        let allocator = InlineStackAllocator::<64>::inline_with_config(StackConfig::production());
        let _ = allocator.allocate_tight(8).unwrap();

        let moved = Box::new(allocator);
        assert_eq!(moved.used(), 8 + RECORD_SIZE);
        assert!(moved.free());
        assert!(moved.is_empty());
    }
}
