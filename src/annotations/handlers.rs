//! Annotation message handlers
//!
//! Handles DrawMsg for the highlighter canvas.

use crate::annotations::canvas::AnnotationCanvas;
use crate::config::PaletteColour;
use crate::session::messages::DrawMsg;

/// Apply a DrawMsg to the canvas.
///
/// Returns true when the overlay or the highlighter state changed and the
/// window should be redrawn.
pub fn handle_draw_msg(
    canvas: &mut AnnotationCanvas,
    msg: DrawMsg,
    highlight_alpha: u8,
) -> bool {
    match msg {
        DrawMsg::StrokeStart => {
            canvas.begin_stroke();
            false
        }
        DrawMsg::StrokeMove(point) => canvas.extend_stroke(point),
        DrawMsg::StrokeEnd => {
            canvas.end_stroke();
            false
        }
        DrawMsg::ToggleHighlight => {
            canvas.toggle_highlight();
            true
        }
        DrawMsg::SetColour(colour) => set_palette_colour(canvas, colour, highlight_alpha),
        DrawMsg::Undo => canvas.undo(),
    }
}

// The colour menu is only offered while the highlighter is on
fn set_palette_colour(canvas: &mut AnnotationCanvas, colour: PaletteColour, alpha: u8) -> bool {
    if !canvas.highlight_mode() {
        log::debug!("Ignoring colour {} outside highlight mode", colour.label());
        return false;
    }
    canvas.set_colour(colour.colour(alpha));
    true
}
