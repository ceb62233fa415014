//! Error types for Ketab workflows.

use ketab_core::{CoordinateError, CoreError, SignError};
use ketab_relay::RelayError;
use ketab_source::SourceError;
use thiserror::Error;

/// Errors that can occur while encoding or publishing.
#[derive(Debug, Error)]
pub enum KetabError {
    /// Source documents could not be loaded.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Coordinate parsing failed.
    #[error("coordinate error: {0}")]
    Coordinate(#[from] CoordinateError),

    /// Signing failed.
    #[error("signing error: {0}")]
    Sign(#[from] SignError),

    /// Delivery failed.
    #[error("relay error: {0}")]
    Relay(#[from] RelayError),

    /// Key or event handling failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Content serialization failed.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A library entry must point at a book.
    #[error("expected a book coordinate (kind 38891), got kind {0}")]
    NotABook(u32),

    /// Ratings run from 1 to 5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

/// Result type for Ketab operations.
pub type Result<T> = std::result::Result<T, KetabError>;
