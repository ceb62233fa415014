//! The event encoder: canonical book → unsigned events.
//!
//! Every event carries its identity in a `d` tag and references its parents
//! and children by coordinate. The encoder is pure; it never signs, reads
//! files or touches the network.

use ketab_core::{
    ActEntry, BookContent, ChapterEntry, Coordinate, EventKind, LibraryContent,
    LibraryEntryContent, PublicKey, ReadStatus, Tag, UnitContent, UnitEntry, UnsignedEvent,
    BOOK_SCHEMA_VERSION, LIBRARY_DESCRIPTION, PROTOCOL_VERSION,
};
use ketab_source::{Book, Chapter, Unit};
use std::collections::HashSet;

use crate::error::{KetabError, Result};

/// Library id used when none is configured.
pub const DEFAULT_LIBRARY_ID: &str = "a5213b36-5ad4-41c0-93d4-06b2adddcea8";

/// Library name used when none is configured.
pub const DEFAULT_LIBRARY_NAME: &str = "the library";

/// Default reason carried by discussion deletion requests.
pub const DEFAULT_DELETION_REASON: &str =
    "Deleting discussion thread - superseded by improved version";

/// Drop repeated chapter numbers, keeping the first occurrence of each.
pub fn unique_chapters(selected: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    selected
        .iter()
        .filter(|number| seen.insert(number.as_str()))
        .cloned()
        .collect()
}

/// A block published by an external clock, used to anchor libraries and books
/// in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAnchor {
    pub clock_pubkey: PublicKey,
    pub block_id: String,
}

impl BlockAnchor {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(EventKind::Block, self.clock_pubkey, self.block_id.clone())
    }
}

/// The library a publication run adds its book to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOptions {
    pub id: String,
    pub name: String,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            id: DEFAULT_LIBRARY_ID.into(),
            name: DEFAULT_LIBRARY_NAME.into(),
        }
    }
}

/// Personal annotations for a library entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOptions {
    pub library_id: String,
    pub notes: Option<String>,
    /// 1..=5.
    pub rating: Option<u8>,
    pub tags: Vec<String>,
    pub read_status: Option<ReadStatus>,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self {
            library_id: DEFAULT_LIBRARY_ID.into(),
            notes: None,
            rating: None,
            tags: Vec::new(),
            read_status: Some(ReadStatus::Reading),
        }
    }
}

/// Builds unsigned events for one author at one point in time.
#[derive(Debug, Clone)]
pub struct Encoder {
    author: PublicKey,
    created_at: i64,
    relay_hint: Option<String>,
    anchor: Option<BlockAnchor>,
}

impl Encoder {
    pub fn new(author: PublicKey, created_at: i64) -> Self {
        Self {
            author,
            created_at,
            relay_hint: None,
            anchor: None,
        }
    }

    /// Append `hint` to every `a` tag.
    pub fn with_relay_hint(mut self, hint: impl Into<String>) -> Self {
        self.relay_hint = Some(hint.into());
        self
    }

    pub fn with_anchor(mut self, anchor: BlockAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn author(&self) -> PublicKey {
        self.author
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Coordinates
    // ─────────────────────────────────────────────────────────────────────────

    pub fn book_coordinate(&self, book: &Book) -> Coordinate {
        Coordinate::new(EventKind::Book, self.author, book.id.clone())
    }

    pub fn chapter_coordinate(&self, chapter: &Chapter) -> Coordinate {
        Coordinate::new(EventKind::Chapter, self.author, chapter.id.clone())
    }

    pub fn unit_coordinate(&self, unit: &Unit) -> Coordinate {
        Coordinate::new(EventKind::Unit, self.author, unit.id.clone())
    }

    pub fn library_coordinate(&self, library_id: &str) -> Coordinate {
        Coordinate::new(EventKind::Library, self.author, library_id)
    }

    fn a_tag(&self, coordinate: &Coordinate) -> Tag {
        let tag = Tag::new("a", coordinate.to_string());
        match &self.relay_hint {
            Some(hint) => tag.with(hint.clone()),
            None => tag,
        }
    }

    fn event(&self, kind: EventKind, tags: Vec<Tag>, content: String) -> UnsignedEvent {
        UnsignedEvent::new(self.author, self.created_at, kind, tags, content)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Unit event (kind 38893).
    pub fn unit(&self, unit: &Unit) -> Result<UnsignedEvent> {
        let content = UnitContent {
            title: unit.title.clone(),
            index: unit.index(),
            ord: unit.ordinal,
            body: unit.body.clone(),
        };
        Ok(self.event(
            EventKind::Unit,
            vec![Tag::new("d", unit.id.clone())],
            serde_json::to_string(&content)?,
        ))
    }

    /// Chapter event (kind 30023). Content is the compiled plain-text body.
    pub fn chapter(&self, book: &Book, chapter: &Chapter) -> UnsignedEvent {
        let mut tags = vec![
            Tag::new("d", chapter.id.clone()),
            Tag::new(
                "title",
                format!("Chapter {}: {}", chapter.number, chapter.title),
            ),
            Tag::new("published_at", self.created_at.to_string()),
            self.a_tag(&self.book_coordinate(book)),
        ];
        tags.extend(
            chapter
                .units
                .iter()
                .map(|unit| self.a_tag(&self.unit_coordinate(unit))),
        );
        self.event(EventKind::Chapter, tags, chapter.compiled_body())
    }

    /// Book event (kind 38891).
    ///
    /// Every chapter appears in the act tree. Only chapters in `selected` that
    /// were loaded list their units and get a reference tag.
    pub fn book(&self, book: &Book, selected: &[String]) -> Result<UnsignedEvent> {
        let is_published = |ch: &Chapter| ch.loaded && selected.iter().any(|n| n == &ch.number);

        let acts = book
            .acts
            .iter()
            .map(|act| ActEntry {
                title: act.title.clone(),
                chapters: act
                    .chapters
                    .iter()
                    .map(|ch| ChapterEntry {
                        number: ch.number.clone(),
                        title: ch.title.clone(),
                        uuid: ch.id.clone(),
                        ketabs: if is_published(ch) {
                            ch.units
                                .iter()
                                .map(|u| UnitEntry {
                                    title: u.title.clone(),
                                    uuid: u.id.clone(),
                                })
                                .collect()
                        } else {
                            Vec::new()
                        },
                    })
                    .collect(),
            })
            .collect();

        // Reference tags follow the selection order.
        let chapter_coordinates: Vec<Coordinate> = unique_chapters(selected)
            .iter()
            .filter_map(|number| book.chapter(number))
            .map(|ch| self.chapter_coordinate(ch))
            .collect();

        let content = BookContent {
            schema_version: BOOK_SCHEMA_VERSION,
            title: book.title.clone(),
            description: book.description.clone(),
            author: book.author.clone(),
            cover_image_url: book.image.clone(),
            published_at: self.created_at,
            chapter_count: chapter_coordinates.len(),
            chapters: chapter_coordinates.iter().map(ToString::to_string).collect(),
            acts,
            shape: book.shape.clone(),
            ref_book_pubkey: self.author.to_hex(),
            ref_book_id: book.id.clone(),
            ref_block_id: self
                .anchor
                .as_ref()
                .map(|a| a.block_id.clone())
                .or_else(|| book.block_id.clone()),
        };

        let mut tags = vec![
            Tag::new("d", book.id.clone()),
            Tag::new("title", book.title.clone()),
            Tag::new("p", self.author.to_hex()),
        ];
        if let Some(image) = &book.image {
            tags.push(Tag::new("image", image.clone()));
        }
        if let Some(thumb) = &book.thumb {
            tags.push(Tag::new("thumb", thumb.clone()));
        }
        if let Some(summary) = &book.summary {
            tags.push(Tag::new("summary", summary.clone()));
        }
        tags.extend(chapter_coordinates.iter().map(|c| self.a_tag(c)));

        Ok(self.event(EventKind::Book, tags, serde_json::to_string(&content)?))
    }

    /// Library event (kind 38890) holding the one book of this run.
    pub fn library(
        &self,
        book: &Book,
        library: &LibraryOptions,
        chapter_count: usize,
    ) -> Result<UnsignedEvent> {
        let book_coordinate = self.book_coordinate(book);
        let author = self.author.to_hex();

        let content = LibraryContent {
            name: library.name.clone(),
            description: LIBRARY_DESCRIPTION.into(),
            books: vec![book_coordinate.to_string()],
            founder_pubkey: author.clone(),
            protocol_version: PROTOCOL_VERSION.into(),
            ref_library_pubkey: author.clone(),
            ref_library_id: library.id.clone(),
            book_count: 1,
            chapter_count,
            reader_count: 0,
            ref_clock_pubkey: self.anchor.as_ref().map(|a| a.clock_pubkey.to_hex()),
            ref_block_id: self.anchor.as_ref().map(|a| a.block_id.clone()),
        };

        let mut tags = vec![
            Tag::new("d", library.id.clone()),
            Tag::new("title", library.name.clone()),
            self.a_tag(&book_coordinate),
            Tag::new("p", author),
        ];
        if let Some(anchor) = &self.anchor {
            tags.push(self.a_tag(&anchor.coordinate()));
            tags.push(Tag::new("p", anchor.clock_pubkey.to_hex()));
        }

        Ok(self.event(EventKind::Library, tags, serde_json::to_string(&content)?))
    }

    /// Library entry event (kind 38892) adding `book` to the encoder author's
    /// library.
    pub fn library_entry(
        &self,
        book: &Coordinate,
        options: &EntryOptions,
    ) -> Result<UnsignedEvent> {
        if !book.is_kind(EventKind::Book) {
            return Err(KetabError::NotABook(book.kind));
        }
        if let Some(rating) = options.rating {
            if !(1..=5).contains(&rating) {
                return Err(KetabError::InvalidRating(rating));
            }
        }

        let book_coordinate = book.to_string();
        let library_coordinate = self.library_coordinate(&options.library_id);

        let content = LibraryEntryContent {
            notes: options.notes.clone().filter(|n| !n.is_empty()),
            rating: options.rating,
            tags: (!options.tags.is_empty()).then(|| options.tags.clone()),
            read_status: options.read_status,
            added_at: self.created_at,
            ref_library_owner_pubkey: self.author.to_hex(),
            ref_library_id: options.library_id.clone(),
            ref_book_coordinate: book_coordinate.clone(),
            ref_book_pubkey: book.author.to_hex(),
            ref_book_id: book.identifier.clone(),
            ref_block_id: self.anchor.as_ref().map(|a| a.block_id.clone()),
        };

        let tags = vec![
            Tag::new("d", format!("{}:{}", options.library_id, book_coordinate)),
            self.a_tag(book),
            self.a_tag(&library_coordinate),
            Tag::new("p", self.author.to_hex()),
            Tag::new("p", book.author.to_hex()),
        ];

        Ok(self.event(
            EventKind::LibraryEntry,
            tags,
            serde_json::to_string(&content)?,
        ))
    }

    /// Deletion request (kind 5) for previously published events.
    pub fn deletion(&self, event_ids: &[String], reason: &str) -> UnsignedEvent {
        let tags = event_ids.iter().map(|id| Tag::new("e", id.clone())).collect();
        self.event(EventKind::Deletion, tags, reason.to_string())
    }
}
