//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    /// An operation reached the player before a session was opened
    #[error("No playback session is open (call Player::open first)")]
    SessionNotOpen,

    /// MIME type outside the supported set
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Transport command issued while no media resource is attached
    #[error("No media resource attached")]
    NoResourceAttached,

    /// Upload carried no bytes
    #[error("Upload is empty: {0}")]
    EmptyUpload(String),

    /// Url is not part of the sample catalog
    #[error("Unknown sample: {0}")]
    UnknownSample(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
