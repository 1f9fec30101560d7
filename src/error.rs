//! Error handling for pinwatch
//!
//! The sampling core itself degrades gracefully instead of failing: malformed
//! control input is ignored, out-of-range rates are clamped, missing value
//! sources fall back to a substitute reading. The error type below covers the
//! surfaces that genuinely can fail — transport bring-up, packet
//! serialization, and config persistence.

use thiserror::Error;

/// Main error type for pinwatch operations
#[derive(Error, Debug)]
pub enum PinWatchError {
    /// Errors reported by the wireless transport implementation
    #[error("Transport error: {0}")]
    Transport(String),

    /// Errors while serializing telemetry packets
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PinWatchError {
    /// Create a transport error from any displayable cause
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        PinWatchError::Transport(cause.to_string())
    }
}

/// Result type alias for pinwatch operations
pub type Result<T> = std::result::Result<T, PinWatchError>;
