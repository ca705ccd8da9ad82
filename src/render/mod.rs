//! Annotation rendering module
//!
//! This module contains:
//! - Constants shared between the overlay rasterizer and on-screen feedback
//! - Overlay rasterization using tiny-skia
//! - Compositing of overlay onto the snip (live preview and export)

pub mod composite;
pub mod geometry;
pub mod image;

pub use composite::composite;
pub use image::OverlayBuffer;
