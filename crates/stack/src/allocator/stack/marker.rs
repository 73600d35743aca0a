//! Stack marker for position tracking

/// Marker representing a position in the stack allocator
///
/// Can be used to rewind the allocator to this position, releasing all
/// allocations made after the marker was created. The position is a byte
/// offset from the start of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StackMarker {
    pub(super) position: usize,
}

impl StackMarker {
    /// Byte offset of this marker from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }
}
