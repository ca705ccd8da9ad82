//! Shared rendering constants
//!
//! Used by both the overlay rasterizer (tiny-skia) and the on-screen
//! selection feedback.

/// Highlighter stroke constants
pub mod highlighter {
    /// Default stroke width in snip pixels
    pub const WIDTH: f32 = 15.0;
    /// Narrowest stroke the rasterizer accepts
    pub const MIN_WIDTH: f32 = 1.0;
}

/// Selection overlay constants
pub mod selection {
    /// Outline colour of the live selection rectangle (RGB)
    pub const OUTLINE_RGB: [u8; 3] = [255, 0, 0];
    /// Outline width in window pixels
    pub const OUTLINE_WIDTH: f32 = 2.0;
}

/// Clamp a configured stroke width into what the rasterizer accepts
#[inline]
pub fn stroke_width(configured: f32) -> f32 {
    if configured.is_finite() {
        configured.max(highlighter::MIN_WIDTH)
    } else {
        highlighter::WIDTH
    }
}
