//! RAII-based stack frame for automatic restoration

use core::mem::ManuallyDrop;

#[cfg(feature = "logging")]
use tracing::warn;

use super::buffer::{HeapBuffer, StackBuffer};
use super::{StackAllocator, StackMarker};
use crate::allocator::AllocResult;

/// RAII helper for stack-based scoped allocation
///
/// Records the allocator position when created and rewinds to it when
/// dropped, releasing everything allocated inside the frame. Frames nest:
/// an inner frame is dropped first and rewinds to its own, higher position.
pub struct StackFrame<'a, B: StackBuffer = HeapBuffer> {
    allocator: &'a StackAllocator<B>,
    marker: StackMarker,
}

impl<'a, B: StackBuffer> StackFrame<'a, B> {
    /// Creates a new stack frame that will restore to the current position
    /// when dropped
    pub fn new(allocator: &'a StackAllocator<B>) -> Self {
        let marker = allocator.mark();
        Self { allocator, marker }
    }

    /// Gets the underlying allocator
    pub fn allocator(&self) -> &'a StackAllocator<B> {
        self.allocator
    }

    /// Position this frame rewinds to
    pub fn marker(&self) -> StackMarker {
        self.marker
    }

    /// Rewinds now and reports whether the frame's position was still valid
    ///
    /// Dropping a frame performs the same rewind but can only log a failure.
    pub fn restore(self) -> AllocResult<()> {
        let frame = ManuallyDrop::new(self);
        frame.allocator.rewind(frame.marker)
    }
}

impl<B: StackBuffer> Drop for StackFrame<'_, B> {
    fn drop(&mut self) {
        if let Err(_error) = self.allocator.rewind(self.marker) {
            #[cfg(feature = "logging")]
            warn!(error = %_error, "stack frame could not rewind to its marker");
        }
    }
}

/// Runs `$body` inside a [`StackFrame`] on `$allocator`
///
/// Everything the body allocates is released when the block ends, and the
/// block's value is returned.
#[macro_export]
macro_rules! with_stack_frame {
    ($allocator:expr, $body:block) => {{
        let _frame = $crate::allocator::StackFrame::new($allocator);
        $body
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::stack::{InlineStackAllocator, StackConfig};

    #[test]
    fn test_frame_rewinds_on_drop() {
        let allocator = StackAllocator::new(1024).unwrap();
        let _ = allocator.allocate(8, 8).unwrap();
        let before = allocator.used();

        {
            let frame = StackFrame::new(&allocator);
            let _ = frame.allocator().allocate(16, 64).unwrap();
            let _ = allocator.allocate_tight(3).unwrap();
            assert!(allocator.used() > before);
        }

        assert_eq!(allocator.used(), before);
    }

    #[test]
    fn test_nested_frames() {
        let allocator = InlineStackAllocator::<512>::new_inline();

        let outer = StackFrame::new(&allocator);
        let _ = allocator.allocate(8, 16).unwrap();
        let middle = allocator.used();
        {
            let _inner = StackFrame::new(&allocator);
            let _ = allocator.allocate(8, 16).unwrap();
        }
        assert_eq!(allocator.used(), middle);

        outer.restore().unwrap();
        assert!(allocator.is_empty());
    }

    #[test]
    fn test_restore_reports_stale_marker() {
        let allocator = StackAllocator::with_config(256, StackConfig::performance()).unwrap();
        let _ = allocator.allocate_tight(4).unwrap();

        let frame = StackFrame::new(&allocator);
        allocator.reset();
        let _ = allocator.allocate_tight(20).unwrap();

        assert!(frame.restore().is_err());
        assert_eq!(allocator.used(), 20 + crate::allocator::stack::RECORD_SIZE);
    }

    #[test]
    fn test_with_stack_frame_macro() {
        let allocator = StackAllocator::new(256).unwrap();

        let value = crate::with_stack_frame!(&allocator, {
            let ptr = allocator.allocate_value(41u32).unwrap();
            // SAFETY: ptr was just initialized and the frame is still open
            unsafe { *ptr.as_ptr() + 1 }
        });

        assert_eq!(value, 42);
        assert!(allocator.is_empty());
    }
}
