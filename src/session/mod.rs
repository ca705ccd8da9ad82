//! Capture session management module
//!
//! This module contains:
//! - The region selector state machine
//! - Session state (selection and annotation sessions)
//! - Message and effect types for the windowing adapter
//! - The session controller that dispatches messages
//! - Keyboard shortcuts

pub mod controller;
pub mod messages;
pub mod selector;
pub mod shortcuts;
pub mod state;

pub use controller::SessionController;
pub use messages::{Effect, Msg};
