//! Overlay rasterization for highlighter strokes using tiny-skia
//!
//! The overlay is a premultiplied RGBA pixmap the size of the snip. Strokes
//! are drawn one segment at a time; the live path and the undo replay both go
//! through [`draw_segment`], so an overlay only ever depends on which strokes
//! were drawn and in what order.

use tiny_skia::{BlendMode, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry;
use crate::config::HighlightColour;
use crate::domain::{ImagePoint, Stroke as HighlightStroke};

/// Transparent annotation layer, same size as the snip it covers
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayBuffer {
    pixmap: Pixmap,
}

impl OverlayBuffer {
    /// Fully transparent buffer; `None` for a zero-sized snip
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// True when no pixel carries any alpha
    #[cfg(test)]
    pub fn is_transparent(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Straight-alpha copy for inspection
    #[cfg(test)]
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.width(), self.height());
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        img
    }
}

/// Draw one round-capped highlighter segment.
///
/// Covered pixels are replaced rather than blended, so overlapping segments
/// and crossing strokes keep the colour's own alpha.
pub fn draw_segment(
    overlay: &mut OverlayBuffer,
    from: ImagePoint,
    to: ImagePoint,
    colour: HighlightColour,
    width: f32,
) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    let Some(path) = pb.finish() else {
        return;
    };

    let [r, g, b, a] = colour.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint.blend_mode = BlendMode::Source;

    let stroke = Stroke {
        width: geometry::stroke_width(width),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    overlay
        .pixmap
        .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Draw every segment of a stroke in point order
pub fn draw_stroke(overlay: &mut OverlayBuffer, stroke: &HighlightStroke, width: f32) {
    for (from, to) in stroke.segments() {
        draw_segment(overlay, from, to, stroke.colour, width);
    }
}

/// Clear the overlay and replay strokes in order
pub fn replay_strokes(overlay: &mut OverlayBuffer, strokes: &[HighlightStroke], width: f32) {
    overlay.clear();
    for stroke in strokes {
        draw_stroke(overlay, stroke, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yellow() -> HighlightColour {
        HighlightColour::new(255, 255, 0, 80)
    }

    #[test]
    fn test_new_overlay_is_transparent() {
        let overlay = OverlayBuffer::new(20, 10).unwrap();
        assert!(overlay.is_transparent());
        assert!(OverlayBuffer::new(0, 10).is_none());
    }

    #[test]
    fn test_segment_paints_translucent_band() {
        let mut overlay = OverlayBuffer::new(60, 30).unwrap();
        draw_segment(
            &mut overlay,
            ImagePoint::new(10.0, 10.0),
            ImagePoint::new(50.0, 10.0),
            yellow(),
            15.0,
        );
        let img = overlay.to_rgba_image();

        let on_line = img.get_pixel(30, 10).0;
        assert!((78..=82).contains(&on_line[3]), "alpha {}", on_line[3]);
        assert!(on_line[0] > 240 && on_line[1] > 240 && on_line[2] < 10);

        assert_eq!(img.get_pixel(30, 25).0[3], 0);
        assert_eq!(img.get_pixel(59, 0).0[3], 0);
    }

    #[test]
    fn test_replay_matches_incremental_drawing() {
        let mut stroke = HighlightStroke::new(yellow());
        stroke.points = vec![
            ImagePoint::new(5.0, 5.0),
            ImagePoint::new(25.0, 18.0),
            ImagePoint::new(40.0, 6.0),
        ];

        let mut live = OverlayBuffer::new(50, 30).unwrap();
        for (from, to) in stroke.segments() {
            draw_segment(&mut live, from, to, stroke.colour, 15.0);
        }

        let mut replayed = OverlayBuffer::new(50, 30).unwrap();
        replay_strokes(&mut replayed, std::slice::from_ref(&stroke), 15.0);
        assert_eq!(live, replayed);

        replay_strokes(&mut replayed, &[], 15.0);
        assert!(replayed.is_transparent());
    }
}
