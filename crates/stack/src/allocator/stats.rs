//! Allocator statistics tracking
//!
//! [`AllocatorStats`] is the public snapshot. The counters behind it live in
//! [`StatsCounters`], which uses plain `Cell`s because stack allocators are
//! single-threaded.

use core::cell::Cell;

/// Statistics for stack allocators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Bytes currently in use, padding and trailer records included
    pub allocated_bytes: usize,
    /// Highest value `allocated_bytes` has reached
    pub peak_allocated_bytes: usize,
    /// Successful allocations
    pub allocation_count: usize,
    /// Successful frees (each rewound allocation counts once)
    pub deallocation_count: usize,
    /// Allocation requests that did not fit
    pub failed_allocations: usize,
    /// Number of resets
    pub reset_count: usize,
    /// Total bytes ever handed out (cumulative, spans included)
    pub total_bytes_allocated: usize,
}

impl AllocatorStats {
    /// Creates a new empty stats object
    pub const fn new() -> Self {
        Self {
            allocated_bytes: 0,
            peak_allocated_bytes: 0,
            allocation_count: 0,
            deallocation_count: 0,
            failed_allocations: 0,
            reset_count: 0,
            total_bytes_allocated: 0,
        }
    }

    /// Calculate the average span of an allocation
    pub fn average_allocation_size(&self) -> Option<f64> {
        if self.allocation_count > 0 {
            Some(self.total_bytes_allocated as f64 / self.allocation_count as f64)
        } else {
            None
        }
    }

    /// Fraction of allocation attempts that succeeded (0.0 to 1.0)
    pub fn allocation_efficiency(&self) -> f64 {
        let total_attempts = self.allocation_count + self.failed_allocations;
        if total_attempts > 0 {
            self.allocation_count as f64 / total_attempts as f64
        } else {
            1.0
        }
    }

    /// Check if there are any active allocations
    pub fn has_active_allocations(&self) -> bool {
        self.allocated_bytes > 0
    }
}

impl core::fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Stack Allocator Statistics:")?;
        writeln!(f, "  Current allocated: {} bytes", self.allocated_bytes)?;
        writeln!(f, "  Peak allocated: {} bytes", self.peak_allocated_bytes)?;
        writeln!(f, "  Allocations: {}", self.allocation_count)?;
        writeln!(f, "  Deallocations: {}", self.deallocation_count)?;
        writeln!(f, "  Failed allocations: {}", self.failed_allocations)?;
        write!(f, "  Resets: {}", self.reset_count)
    }
}

/// Counters updated by the allocator when statistics are enabled
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    failed: Cell<usize>,
    resets: Cell<usize>,
    peak: Cell<usize>,
    total_bytes: Cell<usize>,
}

impl StatsCounters {
    pub(crate) fn record_allocation(&self, span: usize, used_after: usize) {
        self.allocations.set(self.allocations.get() + 1);
        self.total_bytes
            .set(self.total_bytes.get().saturating_add(span));
        if used_after > self.peak.get() {
            self.peak.set(used_after);
        }
    }

    pub(crate) fn record_failure(&self) {
        self.failed.set(self.failed.get() + 1);
    }

    pub(crate) fn record_deallocations(&self, count: usize) {
        self.deallocations.set(self.deallocations.get() + count);
    }

    pub(crate) fn record_reset(&self) {
        self.resets.set(self.resets.get() + 1);
    }

    pub(crate) fn snapshot(&self, allocated_bytes: usize) -> AllocatorStats {
        AllocatorStats {
            allocated_bytes,
            peak_allocated_bytes: self.peak.get(),
            allocation_count: self.allocations.get(),
            deallocation_count: self.deallocations.get(),
            failed_allocations: self.failed.get(),
            reset_count: self.resets.get(),
            total_bytes_allocated: self.total_bytes.get(),
        }
    }

    /// Clears the counters; peak restarts from the current usage
    pub(crate) fn clear(&self, allocated_bytes: usize) {
        self.allocations.set(0);
        self.deallocations.set(0);
        self.failed.set(0);
        self.resets.set(0);
        self.peak.set(allocated_bytes);
        self.total_bytes.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot() {
        let counters = StatsCounters::default();
        counters.record_allocation(24, 24);
        counters.record_allocation(40, 64);
        counters.record_deallocations(1);
        counters.record_failure();

        let stats = counters.snapshot(24);
        assert_eq!(stats.allocation_count, 2);
        assert_eq!(stats.deallocation_count, 1);
        assert_eq!(stats.failed_allocations, 1);
        assert_eq!(stats.peak_allocated_bytes, 64);
        assert_eq!(stats.total_bytes_allocated, 64);
        assert_eq!(stats.average_allocation_size(), Some(32.0));
        assert!(stats.has_active_allocations());
    }

    #[test]
    fn test_clear_keeps_current_usage_as_peak() {
        let counters = StatsCounters::default();
        counters.record_allocation(128, 128);
        counters.record_reset();
        counters.clear(16);

        let stats = counters.snapshot(16);
        assert_eq!(stats.allocation_count, 0);
        assert_eq!(stats.reset_count, 0);
        assert_eq!(stats.peak_allocated_bytes, 16);
    }

    #[test]
    fn test_efficiency_without_attempts() {
        assert_eq!(AllocatorStats::new().allocation_efficiency(), 1.0);
    }
}
