//! Error types for event delivery.

use thiserror::Error;

/// Errors that can occur while delivering an event to one endpoint.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The endpoint is not a valid relay URL.
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// Could not connect to the endpoint.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The relay answered but refused the event.
    #[error("rejected by relay: {0}")]
    Rejected(String),

    /// The relay sent something that is not a valid reply.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No reply within the configured time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Event serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for delivery operations.
pub type Result<T> = std::result::Result<T, RelayError>;
