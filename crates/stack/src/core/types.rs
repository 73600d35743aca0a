//! Common types and constants for memory management

/// Memory size constants
pub mod size {
    /// 1 Kilobyte
    pub const KB: usize = 1024;

    /// 1 Megabyte
    pub const MB: usize = 1024 * KB;

    /// Typical small stack
    pub const SMALL: usize = 32 * KB;

    /// Typical medium stack
    pub const MEDIUM: usize = 512 * KB;

    /// Typical large stack
    pub const LARGE: usize = 8 * MB;
}
