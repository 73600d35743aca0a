//! Stack allocator configuration

/// Configuration for stack allocator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    /// Enable statistics tracking
    pub track_stats: bool,

    /// Fill patterns for debugging
    pub alloc_pattern: Option<u8>,
    pub dealloc_pattern: Option<u8>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            track_stats: cfg!(debug_assertions),
            alloc_pattern: if cfg!(debug_assertions) { Some(0xCC) } else { None },
            dealloc_pattern: if cfg!(debug_assertions) { Some(0xDD) } else { None },
        }
    }
}

impl StackConfig {
    /// Production configuration - statistics only
    pub fn production() -> Self {
        Self {
            track_stats: true,
            alloc_pattern: None,
            dealloc_pattern: None,
        }
    }

    /// Debug configuration - statistics and fill patterns
    pub fn debug() -> Self {
        Self {
            track_stats: true,
            alloc_pattern: Some(0xCC),
            dealloc_pattern: Some(0xDD),
        }
    }

    /// Performance configuration - minimal overhead
    pub fn performance() -> Self {
        Self {
            track_stats: false,
            alloc_pattern: None,
            dealloc_pattern: None,
        }
    }

    /// Enables or disables statistics tracking
    pub fn with_stats(mut self, track_stats: bool) -> Self {
        self.track_stats = track_stats;
        self
    }

    /// Sets the byte written over every new payload
    pub fn with_alloc_pattern(mut self, pattern: u8) -> Self {
        self.alloc_pattern = Some(pattern);
        self
    }

    /// Sets the byte written over every released span
    pub fn with_dealloc_pattern(mut self, pattern: u8) -> Self {
        self.dealloc_pattern = Some(pattern);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!StackConfig::performance().track_stats);
        assert_eq!(StackConfig::debug().alloc_pattern, Some(0xCC));
        assert_eq!(StackConfig::production().dealloc_pattern, None);
    }

    #[test]
    fn test_builder() {
        let config = StackConfig::performance()
            .with_stats(true)
            .with_alloc_pattern(0xAB)
            .with_dealloc_pattern(0xEF);
        assert!(config.track_stats);
        assert_eq!(config.alloc_pattern, Some(0xAB));
        assert_eq!(config.dealloc_pattern, Some(0xEF));
    }
}
