//! Highlighter annotation
//!
//! This module provides:
//! - The annotation canvas (snip, overlay, stroke history, undo)
//! - Message handlers for DrawMsg

pub mod canvas;
pub mod handlers;

pub use canvas::AnnotationCanvas;
