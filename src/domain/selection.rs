//! Selection types for region capture

use super::geometry::{Rect, ScreenPoint, VirtualDesktop};

/// Drag bookkeeping in absolute screen coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRect {
    pub start: ScreenPoint,
    pub end: ScreenPoint,
}

impl SelectionRect {
    /// Zero-size rectangle anchored at `start`
    pub fn anchored(start: ScreenPoint) -> Self {
        Self { start, end: start }
    }

    /// Normalized rectangle translated into the captured frame and clamped to it
    pub fn to_frame_rect(&self, desktop: &VirtualDesktop) -> Rect {
        let start = desktop.to_frame(self.start);
        let end = desktop.to_frame(self.end);
        Rect::from_corners((start.x, start.y), (end.x, end.y)).clamp_to(desktop.frame_bounds())
    }
}

/// Region selector lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectorState {
    /// Waiting for the first pointer press
    #[default]
    Idle,
    /// Button held; rectangle follows the pointer
    Dragging(SelectionRect),
    /// Button released; the selection is final
    Finalized(SelectionRect),
    /// Aborted by the user
    Cancelled,
}
