//! Highlighter canvas: snip, overlay and stroke history
//!
//! The overlay is the only mutable annotation state. It always equals the
//! replay of the committed history, each stroke in its own colour, plus the
//! segments of the stroke currently being drawn.

use image::RgbImage;

use crate::config::HighlightColour;
use crate::domain::{ImagePoint, Stroke};
use crate::render::image::{OverlayBuffer, draw_segment, replay_strokes};
use crate::render::{composite, geometry};

pub struct AnnotationCanvas {
    snip: RgbImage,
    overlay: OverlayBuffer,
    history: Vec<Stroke>,
    current: Option<Stroke>,
    colour: HighlightColour,
    highlight_mode: bool,
    stroke_width: f32,
}

impl AnnotationCanvas {
    /// Canvas over `snip` with a transparent overlay. `None` for an empty snip.
    pub fn new(snip: RgbImage, colour: HighlightColour, stroke_width: f32) -> Option<Self> {
        let overlay = OverlayBuffer::new(snip.width(), snip.height())?;
        Some(Self {
            snip,
            overlay,
            history: Vec::new(),
            current: None,
            colour,
            highlight_mode: false,
            stroke_width: geometry::stroke_width(stroke_width),
        })
    }

    pub fn overlay(&self) -> &OverlayBuffer {
        &self.overlay
    }

    /// Committed strokes, oldest first
    pub fn history(&self) -> &[Stroke] {
        &self.history
    }

    pub fn width(&self) -> u32 {
        self.snip.width()
    }

    pub fn height(&self) -> u32 {
        self.snip.height()
    }

    pub fn colour(&self) -> HighlightColour {
        self.colour
    }

    /// Applies to strokes begun after this call only
    pub fn set_colour(&mut self, colour: HighlightColour) {
        self.colour = colour;
    }

    pub fn highlight_mode(&self) -> bool {
        self.highlight_mode
    }

    /// Leaving highlight mode finishes the stroke in progress
    pub fn set_highlight_mode(&mut self, on: bool) {
        if !on && self.current.is_some() {
            self.end_stroke();
        }
        self.highlight_mode = on;
        log::debug!("Highlight mode {}", if on { "on" } else { "off" });
    }

    pub fn toggle_highlight(&mut self) {
        self.set_highlight_mode(!self.highlight_mode);
    }

    pub fn is_stroking(&self) -> bool {
        self.current.is_some()
    }

    /// Start an empty stroke in the current colour. No-op outside highlight mode.
    pub fn begin_stroke(&mut self) {
        if !self.highlight_mode {
            return;
        }
        self.current = Some(Stroke::new(self.colour));
    }

    /// Append a point, drawing the segment from the previous point right away.
    ///
    /// Returns true when the overlay changed.
    pub fn extend_stroke(&mut self, point: ImagePoint) -> bool {
        let Some(stroke) = self.current.as_mut() else {
            return false;
        };
        let previous = stroke.last_point();
        stroke.points.push(point);

        match previous {
            Some(from) => {
                draw_segment(
                    &mut self.overlay,
                    from,
                    point,
                    stroke.colour,
                    self.stroke_width,
                );
                true
            }
            None => false,
        }
    }

    /// Commit the current stroke if it drew anything, otherwise drop it.
    ///
    /// Returns true when a stroke was committed.
    pub fn end_stroke(&mut self) -> bool {
        let Some(stroke) = self.current.take() else {
            return false;
        };
        if stroke.is_committable() {
            log::debug!("Committed stroke of {} points", stroke.points.len());
            self.history.push(stroke);
            true
        } else {
            false
        }
    }

    /// Drop the most recent stroke and rebuild the overlay from the rest.
    ///
    /// A stroke in progress is abandoned as well. Returns true when the
    /// overlay was rebuilt.
    pub fn undo(&mut self) -> bool {
        let abandoned = self.current.take().is_some_and(|s| s.is_committable());
        let popped = self.history.pop().is_some();
        if !popped && !abandoned {
            return false;
        }
        replay_strokes(&mut self.overlay, &self.history, self.stroke_width);
        log::debug!("Undo: {} stroke(s) remain", self.history.len());
        true
    }

    /// Overlay composited onto the snip, opaque RGB
    pub fn flatten(&self) -> RgbImage {
        composite(&self.snip, &self.overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaletteColour;
    use image::Rgb;

    fn canvas(width: u32, height: u32) -> AnnotationCanvas {
        let snip = RgbImage::from_pixel(width, height, Rgb([40, 60, 200]));
        let mut c = AnnotationCanvas::new(snip, PaletteColour::Yellow.colour(80), 15.0).unwrap();
        c.set_highlight_mode(true);
        c
    }

    fn draw(c: &mut AnnotationCanvas, points: &[(f32, f32)]) {
        c.begin_stroke();
        for &(x, y) in points {
            c.extend_stroke(ImagePoint::new(x, y));
        }
        c.end_stroke();
    }

    fn fresh_replay(c: &AnnotationCanvas) -> OverlayBuffer {
        let mut overlay = OverlayBuffer::new(c.width(), c.height()).unwrap();
        replay_strokes(&mut overlay, c.history(), 15.0);
        overlay
    }

    #[test]
    fn test_begin_stroke_ignored_outside_highlight_mode() {
        let mut c = canvas(50, 50);
        c.set_highlight_mode(false);
        c.begin_stroke();
        assert!(!c.is_stroking());
        assert!(!c.extend_stroke(ImagePoint::new(1.0, 1.0)));
        assert!(!c.end_stroke());
        assert!(c.overlay().is_transparent());
    }

    #[test]
    fn test_single_point_stroke_discarded() {
        let mut c = canvas(50, 50);
        draw(&mut c, &[(10.0, 10.0)]);
        assert!(c.history().is_empty());
        assert!(c.overlay().is_transparent());

        c.begin_stroke();
        assert!(!c.end_stroke());
    }

    #[test]
    fn test_extend_renders_immediately() {
        let mut c = canvas(60, 30);
        c.begin_stroke();
        assert!(!c.extend_stroke(ImagePoint::new(10.0, 10.0)));
        assert!(c.overlay().is_transparent());
        assert!(c.extend_stroke(ImagePoint::new(40.0, 10.0)));
        assert!(!c.overlay().is_transparent());
        assert!(c.history().is_empty());
        assert!(c.end_stroke());
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_undo_each_step_matches_replayed_prefix() {
        let mut c = canvas(80, 80);
        draw(&mut c, &[(5.0, 5.0), (70.0, 10.0)]);
        c.set_colour(PaletteColour::Blue.colour(80));
        draw(&mut c, &[(10.0, 70.0), (40.0, 30.0), (75.0, 75.0)]);
        c.set_colour(PaletteColour::Red.colour(80));
        draw(&mut c, &[(40.0, 5.0), (40.0, 75.0)]);
        assert_eq!(c.history().len(), 3);

        for remaining in (0..3).rev() {
            assert!(c.undo());
            assert_eq!(c.history().len(), remaining);
            assert_eq!(c.overlay(), &fresh_replay(&c));
        }
        assert!(c.overlay().is_transparent());
        assert_eq!(c.overlay(), &OverlayBuffer::new(80, 80).unwrap());
    }

    #[test]
    fn test_undo_empty_history_is_noop() {
        let mut c = canvas(20, 20);
        let before = c.overlay().clone();
        assert!(!c.undo());
        assert_eq!(c.overlay(), &before);
    }

    #[test]
    fn test_undo_abandons_stroke_in_progress() {
        let mut c = canvas(50, 50);
        draw(&mut c, &[(5.0, 5.0), (45.0, 5.0)]);
        let committed = c.overlay().clone();

        c.begin_stroke();
        c.extend_stroke(ImagePoint::new(5.0, 40.0));
        c.extend_stroke(ImagePoint::new(45.0, 40.0));
        assert!(c.undo());
        assert!(!c.is_stroking());
        assert!(c.history().is_empty());
        assert!(c.overlay().is_transparent());
        assert_ne!(c.overlay(), &committed);
    }

    #[test]
    fn test_colour_change_not_retroactive() {
        let mut c = canvas(100, 60);
        draw(&mut c, &[(10.0, 15.0), (90.0, 15.0)]);
        c.set_colour(PaletteColour::Blue.colour(80));
        draw(&mut c, &[(10.0, 45.0), (90.0, 45.0)]);

        assert_eq!(c.history()[0].colour, PaletteColour::Yellow.colour(80));
        assert_eq!(c.history()[1].colour, PaletteColour::Blue.colour(80));

        let out = c.flatten();
        let Rgb([r_a, g_a, b_a]) = *out.get_pixel(50, 15);
        let Rgb([r_b, g_b, b_b]) = *out.get_pixel(50, 45);
        // Yellow lifts red/green and pulls blue down; blue does the opposite
        assert!(r_a > 40 && g_a > 60 && b_a < 200);
        assert!(r_b < 40 && g_b < 60 && b_b > 200);
    }

    #[test]
    fn test_leaving_highlight_mode_commits_stroke() {
        let mut c = canvas(50, 50);
        c.begin_stroke();
        c.extend_stroke(ImagePoint::new(1.0, 1.0));
        c.extend_stroke(ImagePoint::new(30.0, 30.0));
        c.toggle_highlight();
        assert!(!c.highlight_mode());
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_dense_stroke_keeps_highlight_alpha() {
        // Pointer moves arrive a couple of pixels apart during a real drag
        let mut c = canvas(200, 40);
        let across: Vec<(f32, f32)> = (5..=95).map(|i| (i as f32 * 2.0, 20.0)).collect();
        draw(&mut c, &across);

        let alpha_at = |c: &AnnotationCanvas, x, y| c.overlay().pixmap().pixel(x, y).unwrap().alpha();
        let centre = alpha_at(&c, 100, 20);
        assert!((78..=82).contains(&centre), "alpha {centre}");

        // A crossing stroke replaces coverage instead of stacking on it
        let down: Vec<(f32, f32)> = (0..=20).map(|i| (100.0, i as f32 * 2.0)).collect();
        draw(&mut c, &down);
        let crossed = alpha_at(&c, 100, 20);
        assert!((78..=82).contains(&crossed), "alpha {crossed}");

        // Still translucent once flattened
        let Rgb([r, g, b]) = *c.flatten().get_pixel(100, 20);
        assert!(b > 100, "flattened pixel ({r}, {g}, {b})");

        assert_eq!(c.overlay(), &fresh_replay(&c));
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let mut c = canvas(64, 64);
        draw(&mut c, &[(3.0, 3.0), (60.0, 50.0), (10.0, 60.0)]);
        assert_eq!(c.flatten(), c.flatten());
    }

    #[test]
    fn test_empty_snip_rejected() {
        assert!(AnnotationCanvas::new(RgbImage::new(0, 5), HighlightColour::default(), 15.0).is_none());
    }
}
