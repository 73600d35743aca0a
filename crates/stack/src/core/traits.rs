//! Core traits for memory management
//!
//! This module defines the fundamental traits implemented by the stack
//! allocator family.

use crate::allocator::AllocatorStats;

/// Memory usage tracking trait
///
/// Implemented by allocators that know their capacity. Provides both basic
/// capacity information and convenience methods for monitoring.
pub trait MemoryUsage {
    /// Get currently used memory in bytes
    fn used_memory(&self) -> usize;

    /// Get available memory in bytes (if known)
    fn available_memory(&self) -> Option<usize>;

    /// Get total memory capacity in bytes (if known)
    fn total_memory(&self) -> Option<usize> {
        match (self.used_memory(), self.available_memory()) {
            (used, Some(available)) => Some(used + available),
            _ => None,
        }
    }

    /// Returns memory usage as a percentage (0.0 to 100.0)
    ///
    /// Returns `None` if total memory is unknown.
    fn memory_usage_percent(&self) -> Option<f32> {
        self.total_memory().map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.used_memory() as f32 / total as f32) * 100.0
            }
        })
    }

    /// Checks if memory usage is above the specified percentage threshold
    fn is_memory_pressure(&self, threshold_percent: f32) -> Option<bool> {
        self.memory_usage_percent()
            .map(|usage| usage >= threshold_percent)
    }

    /// Returns a snapshot of memory usage
    fn memory_usage(&self) -> BasicMemoryUsage {
        BasicMemoryUsage {
            used: self.used_memory(),
            available: self.available_memory(),
            total: self.total_memory(),
            usage_percent: self.memory_usage_percent(),
        }
    }
}

/// Basic memory usage information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMemoryUsage {
    /// Currently used memory in bytes
    pub used: usize,
    /// Available memory in bytes
    pub available: Option<usize>,
    /// Total memory capacity in bytes
    pub total: Option<usize>,
    /// Memory usage as percentage
    pub usage_percent: Option<f32>,
}

impl core::fmt::Display for BasicMemoryUsage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "used: {} bytes", self.used)?;

        if let Some(total) = self.total {
            write!(f, ", total: {total} bytes")?;
        }

        if let Some(percent) = self.usage_percent {
            write!(f, " ({percent:.1}%)")?;
        }

        Ok(())
    }
}

/// Resettable allocator
///
/// Resetting releases every outstanding allocation at once. The allocators in
/// this crate only hand out raw pointers, so resetting is safe; dereferencing
/// a pointer obtained before the reset is what the caller must avoid.
pub trait Resettable {
    /// Reset allocator to its initial, empty state
    fn reset(&self);

    /// Check if this allocator can be reset
    fn can_reset(&self) -> bool {
        true
    }

    /// Resets the allocator only if `can_reset` allows it
    ///
    /// Returns `true` if reset was performed.
    fn try_reset(&self) -> bool {
        if self.can_reset() {
            self.reset();
            true
        } else {
            false
        }
    }
}

/// Trait for allocators that support statistics collection
pub trait StatisticsProvider {
    /// Get current statistics
    fn statistics(&self) -> AllocatorStats;

    /// Reset statistics
    fn reset_statistics(&self);

    /// Check if statistics collection is enabled
    fn statistics_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedUsage {
        used: usize,
        capacity: usize,
    }

    impl MemoryUsage for FixedUsage {
        fn used_memory(&self) -> usize {
            self.used
        }

        fn available_memory(&self) -> Option<usize> {
            Some(self.capacity - self.used)
        }
    }

    #[test]
    fn test_default_total_and_percent() {
        let usage = FixedUsage {
            used: 25,
            capacity: 100,
        };
        assert_eq!(usage.total_memory(), Some(100));
        assert_eq!(usage.memory_usage_percent(), Some(25.0));
        assert_eq!(usage.is_memory_pressure(20.0), Some(true));
        assert_eq!(usage.is_memory_pressure(30.0), Some(false));
    }

    #[test]
    fn test_basic_usage_display() {
        let usage = FixedUsage {
            used: 50,
            capacity: 200,
        }
        .memory_usage();
        assert_eq!(usage.to_string(), "used: 50 bytes, total: 200 bytes (25.0%)");
    }
}
