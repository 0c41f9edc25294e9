//! ==============================================================================
//! error.rs - error types
//! ==============================================================================
//!
//! purpose:
//!     one error enum for backend, config and io failures. command rejections
//!     display the backend's message unchanged so it can go straight to the
//!     notification.
//!
//! relationships:
//!     - produced by: remote.rs, config.rs
//!     - consumed by: monitor.rs (banner and notification text)
//!
//! ==============================================================================

use thiserror::Error;

/// Result type alias for room monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing with the backend
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// Payload did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Backend refused a device command
    #[error("{0}")]
    CommandRejected(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}
