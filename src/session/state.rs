use chrono::{DateTime, Local};

use super::selector::RegionSelector;
use crate::annotations::AnnotationCanvas;
use crate::capture::CapturedFrame;

/// Hotkey press to crop: the full-desktop frame and the drag over it
pub struct SelectionSession {
    pub selector: RegionSelector,
    pub frame: CapturedFrame,
}

/// One open annotation window
pub struct AnnotationSession {
    pub canvas: AnnotationCanvas,
    pub captured_at: DateTime<Local>,
}

impl AnnotationSession {
    /// Highlighter state shown in the window title and menus
    pub fn status_line(&self) -> String {
        let c = &self.canvas;
        format!(
            "{}x{} | highlighter {} | {} stroke(s)",
            c.width(),
            c.height(),
            if c.highlight_mode() { "on" } else { "off" },
            c.history().len()
        )
    }
}
