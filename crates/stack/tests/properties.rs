//! Property tests for stack allocator invariants.
//!
//! - Every allocate/free pair restores the remaining capacity
//! - Live allocations never overlap and always lie inside the buffer
//! - Rewinding to any recorded marker lands exactly on it

use lifo_stack::allocator::{RECORD_SIZE, StackAllocator, StackConfig};
use proptest::prelude::*;

const CAPACITY: usize = 8 * 1024;

#[derive(Debug, Clone, Copy)]
enum Request {
    Aligned { align_shift: u32, size: usize },
    Tight { size: usize },
}

fn request() -> impl Strategy<Value = Request> {
    prop_oneof![
        (0u32..8, 0usize..256)
            .prop_map(|(align_shift, size)| Request::Aligned { align_shift, size }),
        (0usize..256).prop_map(|size| Request::Tight { size }),
    ]
}

fn perform(allocator: &StackAllocator, request: Request) -> Option<(usize, usize)> {
    match request {
        Request::Aligned { align_shift, size } => allocator
            .allocate(1 << align_shift, size)
            .ok()
            .map(|ptr| (ptr.as_ptr().addr(), size)),
        Request::Tight { size } => allocator
            .allocate_tight(size)
            .ok()
            .map(|ptr| (ptr.as_ptr().addr(), size)),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn allocate_then_free_restores_capacity(
        prefix in proptest::collection::vec(request(), 0..16),
        probe in request(),
    ) {
        let allocator = StackAllocator::with_config(CAPACITY, StackConfig::performance()).unwrap();
        for request in prefix {
            let _ = perform(&allocator, request);
        }

        let before = allocator.remaining_capacity();
        if perform(&allocator, probe).is_some() {
            prop_assert!(allocator.remaining_capacity() < before);
            prop_assert!(allocator.free());
        }
        prop_assert_eq!(allocator.remaining_capacity(), before);
    }

    #[test]
    fn live_allocations_are_disjoint_and_owned(
        requests in proptest::collection::vec(request(), 1..64),
    ) {
        let allocator = StackAllocator::with_config(CAPACITY, StackConfig::debug()).unwrap();
        let start = allocator.as_ptr().as_ptr().addr();

        let mut live: Vec<(usize, usize)> = Vec::new();
        for request in requests {
            if let Some((addr, size)) = perform(&allocator, request) {
                prop_assert!(allocator.owns(std::ptr::without_provenance::<u8>(addr)));
                prop_assert!(addr + size + RECORD_SIZE <= start + CAPACITY);
                for &(other, other_size) in &live {
                    prop_assert!(addr >= other + other_size || addr + size <= other);
                }
                live.push((addr, size));
            }
        }

        prop_assert_eq!(allocator.allocation_count().unwrap(), live.len());
        while allocator.free() {
            live.pop();
        }
        prop_assert!(live.is_empty());
        prop_assert_eq!(allocator.remaining_capacity(), CAPACITY);
    }

    #[test]
    fn rewind_lands_on_every_marker(
        requests in proptest::collection::vec(request(), 1..32),
    ) {
        let allocator = StackAllocator::with_config(CAPACITY, StackConfig::performance()).unwrap();

        let mut markers = Vec::new();
        for request in requests {
            markers.push(allocator.mark());
            let _ = perform(&allocator, request);
        }

        while let Some(marker) = markers.pop() {
            prop_assert!(allocator.rewind(marker).is_ok());
            prop_assert_eq!(allocator.used(), marker.position());
        }
        prop_assert!(allocator.is_empty());
    }

    #[test]
    fn owns_rejects_addresses_outside_buffer(offset in 0usize..4096) {
        let allocator = StackAllocator::new(256).unwrap();
        let start = allocator.as_ptr().as_ptr();

        prop_assert!(!allocator.owns(start.wrapping_add(256 + offset)));
        prop_assert!(!allocator.owns(start.wrapping_sub(1 + offset)));
        prop_assert_eq!(allocator.owns(start.wrapping_add(offset)), offset < 256);
    }
}
