//! Toolkit-free domain types
//!
//! Coordinate spaces, selection bookkeeping and highlighter strokes. Nothing
//! here touches a window or a display, so the math is unit-tested directly.

pub mod annotation;
pub mod geometry;
pub mod selection;

pub use annotation::*;
pub use geometry::*;
pub use selection::*;
