//! Session-level failures
//!
//! Every variant is local to one capture or annotation session; none of
//! them leave state behind for the next hotkey press.

#[derive(Debug, thiserror::Error)]
pub enum SnipError {
    /// No monitor could be enumerated; no window opens
    #[error("No display available: {0}")]
    DisplayUnavailable(String),

    /// The OS refused screen capture
    #[error("Screen capture denied: {0}")]
    CaptureDenied(String),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SnipError>;
