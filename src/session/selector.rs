//! Rectangle-drag region selector
//!
//! Bookkeeping is kept in absolute screen coordinates so a drag that crosses
//! monitors stays consistent. Window coordinates only appear when handing the
//! live rectangle back for drawing.

use crate::domain::{CropBox, Rect, ScreenPoint, SelectionRect, SelectorState, VirtualDesktop};

#[derive(Debug)]
pub struct RegionSelector {
    desktop: VirtualDesktop,
    state: SelectorState,
}

impl RegionSelector {
    pub fn new(desktop: VirtualDesktop) -> Self {
        Self {
            desktop,
            state: SelectorState::Idle,
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn desktop(&self) -> &VirtualDesktop {
        &self.desktop
    }

    /// Idle -> Dragging
    pub fn pointer_down(&mut self, at: ScreenPoint) {
        if self.state == SelectorState::Idle {
            self.state = SelectorState::Dragging(SelectionRect::anchored(at));
        }
    }

    /// Dragging -> Dragging. Returns true when the live rectangle moved.
    pub fn pointer_move(&mut self, at: ScreenPoint) -> bool {
        match &mut self.state {
            SelectorState::Dragging(rect) if rect.end != at => {
                rect.end = at;
                true
            }
            _ => false,
        }
    }

    /// Dragging -> Finalized.
    ///
    /// Returns the crop box in captured-frame coordinates, clamped to the
    /// frame. `None` when the selection has no area or no drag was in
    /// progress.
    pub fn pointer_up(&mut self, at: ScreenPoint) -> Option<CropBox> {
        let SelectorState::Dragging(mut rect) = self.state else {
            return None;
        };
        rect.end = at;
        self.state = SelectorState::Finalized(rect);

        let crop = CropBox::from_frame_rect(rect.to_frame_rect(&self.desktop));
        if crop.is_empty() {
            log::debug!("Degenerate selection at ({}, {}), ignoring", at.x, at.y);
            return None;
        }
        log::info!(
            "Selected {}x{} at ({}, {})",
            crop.width(),
            crop.height(),
            crop.left,
            crop.top
        );
        Some(crop)
    }

    /// Any state -> Cancelled
    pub fn cancel(&mut self) {
        self.state = SelectorState::Cancelled;
    }

    /// Live rectangle for feedback, in coordinates of a window whose
    /// top-left is at `window_origin`
    pub fn live_rect(&self, window_origin: ScreenPoint) -> Option<Rect> {
        let SelectorState::Dragging(rect) = self.state else {
            return None;
        };
        let start = rect.start.to_window(window_origin);
        let end = rect.end.to_window(window_origin);
        Some(Rect::from_corners((start.x, start.y), (end.x, end.y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WindowPoint;

    fn desktop(x: i32, y: i32, width: u32, height: u32) -> VirtualDesktop {
        VirtualDesktop {
            origin: ScreenPoint::new(x, y),
            width,
            height,
        }
    }

    fn select(sel: &mut RegionSelector, from: (i32, i32), to: (i32, i32)) -> Option<CropBox> {
        sel.pointer_down(ScreenPoint::new(from.0, from.1));
        sel.pointer_move(ScreenPoint::new((from.0 + to.0) / 2, (from.1 + to.1) / 2));
        sel.pointer_up(ScreenPoint::new(to.0, to.1))
    }

    #[test]
    fn test_every_drag_direction_normalizes() {
        let drags = [
            ((100, 100), (300, 250)), // down-right
            ((300, 250), (100, 100)), // up-left
            ((300, 100), (100, 250)), // down-left
            ((100, 250), (300, 100)), // up-right
        ];
        for (from, to) in drags {
            let mut sel = RegionSelector::new(desktop(0, 0, 1000, 800));
            let crop = select(&mut sel, from, to).unwrap();
            assert!(crop.left <= crop.right && crop.top <= crop.bottom);
            assert_eq!(crop.width(), (to.0 - from.0).unsigned_abs());
            assert_eq!(crop.height(), (to.1 - from.1).unsigned_abs());
            assert_eq!(
                crop,
                CropBox {
                    left: 100,
                    top: 100,
                    right: 300,
                    bottom: 250
                }
            );
            assert!(matches!(sel.state(), SelectorState::Finalized(_)));
        }
    }

    #[test]
    fn test_click_without_drag_is_degenerate() {
        let mut sel = RegionSelector::new(desktop(0, 0, 1000, 800));
        assert!(select(&mut sel, (50, 60), (50, 60)).is_none());

        let mut sel = RegionSelector::new(desktop(0, 0, 1000, 800));
        assert!(select(&mut sel, (50, 60), (50, 400)).is_none());
    }

    #[test]
    fn test_negative_origin_translates_into_frame() {
        let mut sel = RegionSelector::new(desktop(-1920, -100, 3840, 1180));
        let crop = select(&mut sel, (-1900, -50), (-1700, 50)).unwrap();
        assert_eq!(
            crop,
            CropBox {
                left: 20,
                top: 50,
                right: 220,
                bottom: 150
            }
        );
    }

    #[test]
    fn test_pointer_outside_desktop_is_clamped() {
        let mut sel = RegionSelector::new(desktop(0, 0, 1000, 800));
        let crop = select(&mut sel, (900, 700), (1015, 830)).unwrap();
        assert_eq!(
            crop,
            CropBox {
                left: 900,
                top: 700,
                right: 1000,
                bottom: 800
            }
        );

        let mut sel = RegionSelector::new(desktop(0, 0, 1000, 800));
        let crop = select(&mut sel, (-8, -3), (40, 30)).unwrap();
        assert_eq!((crop.left, crop.top), (0, 0));
    }

    #[test]
    fn test_live_rect_uses_window_coordinates() {
        let mut sel = RegionSelector::new(desktop(-1280, 0, 3200, 1080));
        let window_origin = ScreenPoint::new(-1280, 0);
        assert!(sel.live_rect(window_origin).is_none());

        sel.pointer_down(WindowPoint::new(10, 20).to_screen(window_origin));
        assert!(sel.pointer_move(WindowPoint::new(5, 90).to_screen(window_origin)));
        assert_eq!(sel.live_rect(window_origin), Some(Rect::new(5, 20, 10, 90)));
    }

    #[test]
    fn test_events_after_finish_ignored() {
        let mut sel = RegionSelector::new(desktop(0, 0, 100, 100));
        sel.pointer_up(ScreenPoint::new(5, 5));
        assert_eq!(sel.state(), SelectorState::Idle);

        sel.cancel();
        sel.pointer_down(ScreenPoint::new(1, 1));
        assert!(!sel.pointer_move(ScreenPoint::new(50, 50)));
        assert!(sel.pointer_up(ScreenPoint::new(50, 50)).is_none());
        assert_eq!(sel.state(), SelectorState::Cancelled);
    }
}
