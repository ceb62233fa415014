//! Error types for Ketab Core.

use thiserror::Error;

/// Core errors that can occur while handling keys and events.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("event id mismatch: expected {expected}, got {actual}")]
    EventIdMismatch { expected: String, actual: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Errors produced when parsing a coordinate string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("malformed coordinate '{0}': expected <kind>:<author>:<identifier>")]
    Malformed(String),

    #[error("invalid coordinate kind '{0}'")]
    InvalidKind(String),

    #[error("invalid coordinate author '{0}': expected 64 hex characters")]
    InvalidAuthor(String),
}

/// Errors raised by a [`Signer`](crate::Signer).
#[derive(Debug, Error)]
pub enum SignError {
    #[error("event pubkey {event} does not match signer identity {signer}")]
    IdentityMismatch { event: String, signer: String },

    #[error("event serialization failed: {0}")]
    Serialization(String),

    #[error("signer unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::EncodingError(e.to_string())
    }
}
