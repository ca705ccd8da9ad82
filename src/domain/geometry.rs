//! Geometric types for capture regions and the coordinate spaces they live in
//!
//! Four coordinate spaces are kept apart by type:
//! - [`ScreenPoint`]: absolute virtual-desktop coordinates (may be negative)
//! - [`WindowPoint`]: local to the selection overlay window
//! - [`FramePoint`]: local to the captured frame (desktop origin at 0,0)
//! - [`ImagePoint`]: local to the cropped snip, sub-pixel

/// Size and position of a rectangle, right/bottom exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a normalized rectangle from two arbitrary corners
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            left: a.0.min(b.0),
            top: a.1.min(b.1),
            right: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Clamp every edge into `bounds`; a rectangle fully outside collapses to an edge
    pub fn clamp_to(&self, bounds: Rect) -> Rect {
        Rect {
            left: self.left.clamp(bounds.left, bounds.right),
            top: self.top.clamp(bounds.top, bounds.bottom),
            right: self.right.clamp(bounds.left, bounds.right),
            bottom: self.bottom.clamp(bounds.top, bounds.bottom),
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Absolute position on the virtual desktop
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Express this point relative to a window whose top-left sits at `window_origin`
    pub fn to_window(self, window_origin: ScreenPoint) -> WindowPoint {
        WindowPoint {
            x: self.x - window_origin.x,
            y: self.y - window_origin.y,
        }
    }
}

/// Position relative to the selection overlay window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowPoint {
    pub x: i32,
    pub y: i32,
}

impl WindowPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Lift a window-local position back to absolute screen coordinates
    pub fn to_screen(self, window_origin: ScreenPoint) -> ScreenPoint {
        ScreenPoint {
            x: self.x + window_origin.x,
            y: self.y + window_origin.y,
        }
    }
}

/// Position inside the captured frame, origin at the desktop's top-left
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FramePoint {
    pub x: i32,
    pub y: i32,
}

/// Sub-pixel position inside the cropped snip
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImagePoint {
    pub x: f32,
    pub y: f32,
}

impl ImagePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Union bounding box of every monitor, in absolute screen coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualDesktop {
    pub origin: ScreenPoint,
    pub width: u32,
    pub height: u32,
}

impl VirtualDesktop {
    /// Fold monitor rectangles into their union. `None` when there are none.
    pub fn from_monitor_rects(rects: impl IntoIterator<Item = Rect>) -> Option<Self> {
        let bounds = rects.into_iter().reduce(|acc, r| acc.union(r))?;
        Some(Self {
            origin: ScreenPoint::new(bounds.left, bounds.top),
            width: bounds.width().max(0) as u32,
            height: bounds.height().max(0) as u32,
        })
    }

    /// Desktop extent in frame-local coordinates
    pub fn frame_bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn to_frame(&self, p: ScreenPoint) -> FramePoint {
        FramePoint {
            x: p.x - self.origin.x,
            y: p.y - self.origin.y,
        }
    }
}

/// Finalized crop region in captured-frame coordinates, right/bottom exclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    /// Convert a frame-local rectangle that is already clamped to the frame
    pub fn from_frame_rect(rect: Rect) -> Self {
        Self {
            left: rect.left.max(0) as u32,
            top: rect.top.max(0) as u32,
            right: rect.right.max(0) as u32,
            bottom: rect.bottom.max(0) as u32,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Zero width or height; opens no annotation window
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes_any_direction() {
        let expected = Rect::new(10, 20, 110, 220);
        assert_eq!(Rect::from_corners((10, 20), (110, 220)), expected);
        assert_eq!(Rect::from_corners((110, 220), (10, 20)), expected);
        assert_eq!(Rect::from_corners((10, 220), (110, 20)), expected);
        assert_eq!(Rect::from_corners((110, 20), (10, 220)), expected);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = Rect::new(0, 0, 100, 50);
        let r = Rect::new(-5, 10, 120, 60).clamp_to(bounds);
        assert_eq!(r, Rect::new(0, 10, 100, 50));

        let outside = Rect::new(150, 70, 200, 90).clamp_to(bounds);
        assert_eq!((outside.width(), outside.height()), (0, 0));
    }

    #[test]
    fn test_window_screen_round_trip_with_negative_origin() {
        let origin = ScreenPoint::new(-1920, -200);
        let w = WindowPoint::new(30, 40);
        let s = w.to_screen(origin);
        assert_eq!(s, ScreenPoint::new(-1890, -160));
        assert_eq!(s.to_window(origin), w);
    }

    #[test]
    fn test_virtual_desktop_union_includes_left_monitor() {
        let primary = Rect::new(0, 0, 1920, 1080);
        let left = Rect::new(-1280, 100, 0, 1124);
        let desktop = VirtualDesktop::from_monitor_rects([primary, left]).unwrap();
        assert_eq!(desktop.origin, ScreenPoint::new(-1280, 0));
        assert_eq!(desktop.width, 3200);
        assert_eq!(desktop.height, 1124);
        assert_eq!(
            desktop.to_frame(ScreenPoint::new(0, 0)),
            FramePoint { x: 1280, y: 0 }
        );
    }

    #[test]
    fn test_virtual_desktop_empty() {
        assert!(VirtualDesktop::from_monitor_rects(Vec::new()).is_none());
    }

    #[test]
    fn test_crop_box_empty() {
        let b = CropBox::from_frame_rect(Rect::new(5, 5, 5, 40));
        assert!(b.is_empty());
        let b = CropBox::from_frame_rect(Rect::new(5, 5, 25, 40));
        assert_eq!((b.width(), b.height()), (20, 35));
    }
}
