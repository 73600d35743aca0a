//! Standalone error types for lifo-stack
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::{error, warn};

// ============================================================================
// Main Error Types
// ============================================================================

/// Stack allocator errors
///
/// Only [`MemoryError::CapacityExceeded`] is part of normal operation. The
/// other variants report misuse or a damaged buffer. No variant is ever
/// returned after the allocator's cursor has been modified.
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    // --- Allocation Errors ---
    #[error("Memory allocation failed: {size} bytes with {align} byte alignment")]
    AllocationFailed { size: usize, align: usize },

    #[error(
        "Stack capacity exceeded: {requested} bytes with {align} byte alignment requested, {available} bytes available"
    )]
    CapacityExceeded {
        requested: usize,
        align: usize,
        available: usize,
    },

    #[error("Invalid alignment: {alignment}")]
    InvalidAlignment { alignment: usize },

    #[error("Size overflow during operation: {operation}")]
    SizeOverflow { operation: String },

    // --- Construction Errors ---
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // --- Marker Errors ---
    #[error("Invalid stack marker at offset {position} (cursor at {cursor})")]
    InvalidMarker { position: usize, cursor: usize },

    // --- System Errors ---
    #[error("Memory corruption detected in {component}: {details}")]
    Corruption { component: String, details: String },
}

impl MemoryError {
    /// Check if error is retryable
    ///
    /// A request that did not fit may succeed after a `free()` or `reset()`.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AllocationFailed { .. } => "MEM:ALLOC:FAILED",
            Self::CapacityExceeded { .. } => "MEM:STACK:CAPACITY",
            Self::InvalidAlignment { .. } => "MEM:ALLOC:ALIGN",
            Self::SizeOverflow { .. } => "MEM:ALLOC:OVERFLOW",
            Self::InvalidConfig { .. } => "MEM:CONFIG:INVALID",
            Self::InvalidMarker { .. } => "MEM:STACK:MARKER",
            Self::Corruption { .. } => "MEM:SYSTEM:CORRUPTION",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create capacity exceeded error
    pub fn capacity_exceeded(requested: usize, align: usize, available: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(
            requested,
            align, available, "stack allocation does not fit in remaining capacity"
        );

        Self::CapacityExceeded {
            requested,
            align,
            available,
        }
    }

    /// Create allocation failed error
    ///
    /// Raised when the backing buffer cannot be acquired from the global
    /// allocator.
    pub fn allocation_failed(size: usize, align: usize) -> Self {
        #[cfg(feature = "logging")]
        error!(size, align, "stack buffer allocation failed");

        Self::AllocationFailed { size, align }
    }

    /// Create invalid alignment error
    #[must_use]
    pub fn invalid_alignment(alignment: usize) -> Self {
        Self::InvalidAlignment { alignment }
    }

    /// Create size overflow error
    pub fn size_overflow(operation: &str) -> Self {
        Self::SizeOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }

    /// Create invalid marker error
    #[must_use]
    pub fn invalid_marker(position: usize, cursor: usize) -> Self {
        Self::InvalidMarker { position, cursor }
    }

    /// Create memory corruption error
    pub fn corruption(component: &str, details: &str) -> Self {
        #[cfg(feature = "logging")]
        error!("Memory corruption: {component} - {details}");

        Self::Corruption {
            component: component.to_string(),
            details: details.to_string(),
        }
    }

    /// Check if this is a capacity exceeded error
    #[must_use]
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for memory operations
pub type MemoryResult<T> = core::result::Result<T, MemoryError>;

/// Generic result type alias
pub type Result<T> = MemoryResult<T>;

/// Type aliases used by the allocator module
pub type AllocError = MemoryError;
pub type AllocResult<T> = MemoryResult<T>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exceeded_message() {
        let error = MemoryError::capacity_exceeded(100, 16, 64);
        let message = error.to_string();
        assert!(message.contains("100"));
        assert!(message.contains("16"));
        assert!(message.contains("64"));
    }

    #[test]
    fn test_allocation_failed_message() {
        let error = MemoryError::allocation_failed(4096, 1);
        assert_eq!(error, MemoryError::AllocationFailed { size: 4096, align: 1 });
        assert!(error.to_string().contains("4096"));
        assert_eq!(error.code(), "MEM:ALLOC:FAILED");
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MemoryError::capacity_exceeded(1, 1, 0).code(),
            "MEM:STACK:CAPACITY"
        );
        assert_eq!(MemoryError::invalid_alignment(3).code(), "MEM:ALLOC:ALIGN");
        assert_eq!(MemoryError::invalid_marker(8, 0).code(), "MEM:STACK:MARKER");
        assert_eq!(
            MemoryError::corruption("stack", "bad record").code(),
            "MEM:SYSTEM:CORRUPTION"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(MemoryError::capacity_exceeded(128, 8, 16).is_retryable());
        assert!(!MemoryError::invalid_alignment(3).is_retryable());
        assert!(!MemoryError::invalid_config("zero capacity").is_retryable());
    }
}
