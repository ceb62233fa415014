//! Event kinds used by the Ketab protocol.
//!
//! Kind numbers are protocol constants. Consumers must agree on the same
//! numbering out of band; this crate treats them as opaque integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of an event, determining how its tags and content are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum EventKind {
    /// Deletion request for previously published events.
    Deletion = 5,
    /// Long-form chapter text.
    Chapter = 30023,
    /// Block event published by an external clock.
    Block = 38808,
    /// Library: book curation container.
    Library = 38890,
    /// Book metadata and table of contents.
    Book = 38891,
    /// Library-specific metadata about a curated book.
    LibraryEntry = 38892,
    /// A single numbered passage (unit) of a chapter.
    Unit = 38893,
}

impl EventKind {
    /// Convert to u32 for serialization.
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    /// Try to parse from u32.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            5 => Some(Self::Deletion),
            30023 => Some(Self::Chapter),
            38808 => Some(Self::Block),
            38890 => Some(Self::Library),
            38891 => Some(Self::Book),
            38892 => Some(Self::LibraryEntry),
            38893 => Some(Self::Unit),
            _ => None,
        }
    }

    /// Prefix every coordinate of this kind starts with, e.g. `"38891:"`.
    pub fn coordinate_prefix(self) -> String {
        format!("{}:", self.to_u32())
    }

    /// Human-readable event name used in validation reasons.
    pub fn label(self) -> &'static str {
        match self {
            Self::Deletion => "Deletion",
            Self::Chapter => "Chapter",
            Self::Block => "Block",
            Self::Library => "Library",
            Self::Book => "Book",
            Self::LibraryEntry => "Library Entry",
            Self::Unit => "Unit",
        }
    }

    /// Check if this is one of the addressable (replaceable) kinds.
    pub fn is_addressable(self) -> bool {
        !matches!(self, Self::Deletion)
    }
}

impl From<EventKind> for u32 {
    fn from(kind: EventKind) -> Self {
        kind.to_u32()
    }
}

impl TryFrom<u32> for EventKind {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or_else(|| format!("unknown event kind {value}"))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u32())
    }
}
