//! Utility functions and helpers for lifo-stack
//!
//! Alignment helpers shared by the allocator placement code.

/// Aligns a value up, returning `None` if the result would overflow `usize`
///
/// # Examples
/// ```
/// use lifo_stack::utils::checked_align_up;
///
/// assert_eq!(checked_align_up(9, 8), Some(16));
/// assert_eq!(checked_align_up(usize::MAX, 8), None);
/// ```
#[inline(always)]
pub const fn checked_align_up(value: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    match value.checked_add(alignment - 1) {
        Some(bumped) => Some(bumped & !(alignment - 1)),
        None => None,
    }
}

/// Checks if a value is aligned to the given alignment
///
/// # Examples
/// ```
/// use lifo_stack::utils::is_aligned;
///
/// assert!(is_aligned(16, 8));
/// assert!(!is_aligned(17, 8));
/// ```
#[inline(always)]
pub const fn is_aligned(value: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    value & (alignment - 1) == 0
}

/// Calculates padding needed to align a value
///
/// # Examples
/// ```
/// use lifo_stack::utils::padding_needed;
///
/// assert_eq!(padding_needed(7, 8), 1);
/// assert_eq!(padding_needed(8, 8), 0);
/// assert_eq!(padding_needed(9, 8), 7);
/// ```
#[inline(always)]
pub const fn padding_needed(value: usize, alignment: usize) -> usize {
    // `wrapping_neg` keeps this total for values near `usize::MAX`
    value.wrapping_neg() & (alignment - 1)
}

/// Check if a pointer is properly aligned
#[inline(always)]
pub fn is_aligned_ptr<T>(ptr: *const T, alignment: usize) -> bool {
    is_aligned(ptr.addr(), alignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_matches_checked_align_up() {
        for alignment in [1, 2, 4, 8, 16, 64, 4096] {
            for value in 0..200 {
                assert_eq!(
                    value + padding_needed(value, alignment),
                    checked_align_up(value, alignment).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_checked_align_up_near_max() {
        assert_eq!(checked_align_up(usize::MAX - 7, 8), Some(usize::MAX - 7));
        assert_eq!(checked_align_up(usize::MAX - 6, 8), None);
        assert_eq!(padding_needed(usize::MAX, 8), 1);
    }

    #[test]
    fn test_is_aligned_ptr() {
        let value = 0u64;
        assert!(is_aligned_ptr(&raw const value, core::mem::align_of::<u64>()));
    }
}
