//! Error types for telefs

use thiserror::Error;

/// Errors that can occur while locating or reading a resource
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Input address could not be parsed or is missing required parameters
    #[error("Address format error: {0}")]
    AddressFormat(String),

    /// Login exchange failed or the token field was absent
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Socket connect/join/send/disconnect failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Reply payload missing an expected field, or payload decode failed
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Requested byte range invalid or exceeds the supported size
    #[error("Invalid byte range [{start}, {end}]: {reason}")]
    Range {
        start: u64,
        end: u64,
        reason: String,
    },

    /// Deadline expired while waiting for a correlated reply
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for locator operations
pub type Result<T> = std::result::Result<T, LocatorError>;
