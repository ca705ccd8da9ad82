//! Message types for capture and annotation sessions
//!
//! This module contains:
//! - Msg enum with nested sub-enums, fed by the windowing adapter
//! - Effect enum telling the adapter what to show next

use std::path::PathBuf;

use crate::config::PaletteColour;
use crate::domain::{ImagePoint, ScreenPoint, VirtualDesktop};

// ============================================================================
// Selection Types
// ============================================================================

/// Pointer events on the selection overlay, in absolute screen coordinates
#[derive(Debug, Clone, Copy)]
pub enum SelectMsg {
    /// Button pressed
    PointerDown(ScreenPoint),
    /// Pointer moved with the button held
    PointerMove(ScreenPoint),
    /// Button released
    PointerUp(ScreenPoint),
    /// Escape pressed or overlay closed
    Cancel,
}

// ============================================================================
// Drawing Types
// ============================================================================

/// Highlighter messages from the annotation window, in snip coordinates
#[derive(Debug, Clone, Copy)]
pub enum DrawMsg {
    /// Button pressed on the snip
    StrokeStart,
    /// Pointer position while the button is held
    StrokeMove(ImagePoint),
    /// Button released
    StrokeEnd,
    /// Toggle highlighter on/off
    ToggleHighlight,
    /// Pick a palette colour for the next strokes
    SetColour(PaletteColour),
    /// Undo last highlight
    Undo,
}

// ============================================================================
// Export Types
// ============================================================================

/// Save workflow messages
#[derive(Debug, Clone)]
pub enum SaveMsg {
    /// User asked to save; adapter should show a dialog
    Request,
    /// Dialog returned a path
    PathChosen(PathBuf),
    /// Dialog dismissed
    Cancelled,
}

// ============================================================================
// Main Message Enum
// ============================================================================

/// Everything the adapter can tell the session controller
#[derive(Debug, Clone)]
pub enum Msg {
    /// Global hotkey pressed
    Trigger,
    /// Selection overlay events
    Select(SelectMsg),
    /// Annotation window events
    Draw(DrawMsg),
    /// Export workflow
    Save(SaveMsg),
    /// Annotation window closed by the user
    CloseAnnotation,
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl Msg {
    pub fn pointer_down(p: ScreenPoint) -> Self {
        Self::Select(SelectMsg::PointerDown(p))
    }
    pub fn pointer_move(p: ScreenPoint) -> Self {
        Self::Select(SelectMsg::PointerMove(p))
    }
    pub fn pointer_up(p: ScreenPoint) -> Self {
        Self::Select(SelectMsg::PointerUp(p))
    }
    pub fn cancel_selection() -> Self {
        Self::Select(SelectMsg::Cancel)
    }

    pub fn stroke_start() -> Self {
        Self::Draw(DrawMsg::StrokeStart)
    }
    pub fn stroke_move(x: f32, y: f32) -> Self {
        Self::Draw(DrawMsg::StrokeMove(ImagePoint::new(x, y)))
    }
    pub fn stroke_end() -> Self {
        Self::Draw(DrawMsg::StrokeEnd)
    }
    pub fn toggle_highlight() -> Self {
        Self::Draw(DrawMsg::ToggleHighlight)
    }
    pub fn set_colour(colour: PaletteColour) -> Self {
        Self::Draw(DrawMsg::SetColour(colour))
    }
    pub fn undo() -> Self {
        Self::Draw(DrawMsg::Undo)
    }

    pub fn save() -> Self {
        Self::Save(SaveMsg::Request)
    }
    pub fn save_to(path: impl Into<PathBuf>) -> Self {
        Self::Save(SaveMsg::PathChosen(path.into()))
    }
    pub fn save_cancelled() -> Self {
        Self::Save(SaveMsg::Cancelled)
    }
}

// ============================================================================
// Effects
// ============================================================================

/// What the adapter should do after a message was handled
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing visible changed
    None,
    /// Cover the whole virtual desktop with the selection overlay
    OpenSelectionOverlay(VirtualDesktop),
    /// Tear down the selection overlay without opening anything
    CloseSelectionOverlay,
    /// Selection overlay is gone; show the annotation window for a new snip
    OpenAnnotationWindow { width: u32, height: u32 },
    /// Annotation window is gone
    CloseAnnotationWindow,
    /// Overlay pixels or selection rectangle changed
    Redraw,
    /// Ask the user for a save path, starting from this suggestion
    ChooseSavePath(PathBuf),
    /// Snip written to this path
    Saved(PathBuf),
    /// Session failed; message is user-facing
    Error(String),
}
