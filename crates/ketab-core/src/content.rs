//! JSON content bodies carried by each event kind.
//!
//! Every content body repeats the identifying fields already present in the
//! event's tags. Tags serve relay-side filtering, content serves clients and
//! the validator's referential checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Protocol version stamped into library content.
pub const PROTOCOL_VERSION: &str = "0.1.0";

/// Marker for the nested-acts Book content layout.
pub const BOOK_SCHEMA_VERSION: u32 = 2;

/// Fixed description of every library event.
pub const LIBRARY_DESCRIPTION: &str = "Books published on Nostr. Read by citizens.";

/// Content of a Unit event (kind 38893).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitContent {
    pub title: String,
    /// 0-based position within the chapter.
    pub index: u32,
    /// 1-based ordinal as authored.
    pub ord: u32,
    pub body: String,
}

/// A unit as listed in the Book event's act tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub title: String,
    pub uuid: String,
}

/// A chapter as listed in the Book event's act tree.
///
/// `ketabs` is empty for chapters outside the published selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub number: String,
    pub title: String,
    pub uuid: String,
    pub ketabs: Vec<UnitEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActEntry {
    pub title: String,
    pub chapters: Vec<ChapterEntry>,
}

/// Presentational unit reference from a shape document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeUnit {
    pub title: String,
    pub d_tag: String,
}

/// Presentational chapter reference from a shape document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeChapter {
    pub title: String,
    pub d_tag: String,
    #[serde(default)]
    pub ketabs: Vec<ShapeUnit>,
}

/// Content of a Book event (kind 38891).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookContent {
    pub schema_version: u32,
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub published_at: i64,
    pub chapter_count: usize,
    /// Chapter coordinates of the published selection.
    pub chapters: Vec<String>,
    pub acts: Vec<ActEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<Vec<ShapeChapter>>>,
    /// Must equal the event pubkey.
    pub ref_book_pubkey: String,
    pub ref_book_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_id: Option<String>,
}

/// Content of a Library event (kind 38890).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryContent {
    pub name: String,
    pub description: String,
    pub books: Vec<String>,
    pub founder_pubkey: String,
    pub protocol_version: String,
    pub ref_library_pubkey: String,
    pub ref_library_id: String,
    pub book_count: usize,
    pub chapter_count: usize,
    pub reader_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_clock_pubkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_id: Option<String>,
}

/// Reading progress recorded in a library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadStatus {
    WantToRead,
    Reading,
    Finished,
    Abandoned,
}

impl ReadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WantToRead => "want-to-read",
            Self::Reading => "reading",
            Self::Finished => "finished",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want-to-read" => Ok(Self::WantToRead),
            "reading" => Ok(Self::Reading),
            "finished" => Ok(Self::Finished),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(format!(
                "unknown read status '{other}' (want-to-read, reading, finished, abandoned)"
            )),
        }
    }
}

/// Content of a Library Entry event (kind 38892).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntryContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// 1..=5 when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_status: Option<ReadStatus>,
    pub added_at: i64,
    pub ref_library_owner_pubkey: String,
    pub ref_library_id: String,
    pub ref_book_coordinate: String,
    pub ref_book_pubkey: String,
    pub ref_book_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_id: Option<String>,
}
