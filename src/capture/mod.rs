//! Screen capture module
//!
//! This module consolidates:
//! - Display backends and pixel-order normalization (backend.rs)
//! - Virtual desktop resolution (geometry.rs)
//! - Full-desktop capture and cropping (frame.rs)

pub mod backend;
pub mod frame;
pub mod geometry;

pub use backend::{DisplayBackend, XcapBackend};
pub use frame::{CapturedFrame, capture};
pub use geometry::{DesktopLayout, resolve};
