//! Core application module
//!
//! This module contains:
//! - Application entry point and the eframe adapter that feeds the
//!   session controller and acts on its effects

pub mod app;
