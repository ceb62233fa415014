//! Error types for source loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a book directory.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The root document is missing, unparsable or incomplete.
    #[error("failed to load book: {0}")]
    Load(String),

    /// A referenced chapter or unit could not be read.
    #[error("partial content: {0}")]
    PartialContent(String),

    /// I/O error on a specific path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON error on a specific document.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
