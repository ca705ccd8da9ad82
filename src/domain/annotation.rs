//! Annotation types for drawing on snips
//!
//! Stroke points are stored in snip-local pixel coordinates.

use super::geometry::ImagePoint;
use crate::config::HighlightColour;

/// One continuous highlighter drag, rendered with a single colour
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub points: Vec<ImagePoint>,
    /// Colour captured when the stroke began
    pub colour: HighlightColour,
}

impl Stroke {
    pub fn new(colour: HighlightColour) -> Self {
        Self {
            points: Vec::new(),
            colour,
        }
    }

    pub fn last_point(&self) -> Option<ImagePoint> {
        self.points.last().copied()
    }

    /// Consecutive point pairs in drawing order
    pub fn segments(&self) -> impl Iterator<Item = (ImagePoint, ImagePoint)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Strokes with fewer than two points render nothing and are never committed
    pub fn is_committable(&self) -> bool {
        self.points.len() >= 2
    }
}
