//! Validator vectors: hand-built events with known verdicts.
//!
//! Each vector starts from a conformant event and breaks one rule, so the
//! expected reason pins down which check fired.

use serde_json::{json, Value};

use ketab_core::{Coordinate, EventKind, PublicKey, Tag, UnsignedEvent};

/// A validator test case.
#[derive(Debug, Clone)]
pub struct ValidationVector {
    pub name: &'static str,
    pub event: UnsignedEvent,
    pub valid: bool,
    /// The exact rejection reason, or the success reason.
    pub reason: String,
}

pub const AUTHOR: PublicKey = PublicKey::from_bytes([0x11; 32]);
pub const READER: PublicKey = PublicKey::from_bytes([0x22; 32]);
pub const CLOCK: PublicKey = PublicKey::from_bytes([0x33; 32]);

const CREATED_AT: i64 = 1_700_000_000;

fn book_coordinate() -> String {
    Coordinate::new(EventKind::Book, AUTHOR, "book-1").to_string()
}

fn block_coordinate() -> String {
    Coordinate::new(EventKind::Block, CLOCK, "block-1").to_string()
}

fn with_content(mut event: UnsignedEvent, edit: impl FnOnce(&mut serde_json::Map<String, Value>)) -> UnsignedEvent {
    let mut content: Value = serde_json::from_str(&event.content).unwrap_or(Value::Null);
    if let Some(map) = content.as_object_mut() {
        edit(map);
    }
    event.content = content.to_string();
    event
}

fn without_tag(mut event: UnsignedEvent, name: &str) -> UnsignedEvent {
    event.tags.retain(|t| t.name() != Some(name));
    event
}

/// A conformant Book event.
pub fn valid_book() -> UnsignedEvent {
    UnsignedEvent::new(
        AUTHOR,
        CREATED_AT,
        EventKind::Book,
        vec![
            Tag::new("d", "book-1"),
            Tag::new("title", "Book One"),
            Tag::new("p", AUTHOR.to_hex()),
        ],
        json!({
            "schema_version": 2,
            "title": "Book One",
            "description": "About book one",
            "author": "An Author",
            "published_at": CREATED_AT,
            "chapter_count": 0,
            "chapters": [],
            "acts": [],
            "ref_book_pubkey": AUTHOR.to_hex(),
            "ref_book_id": "book-1",
            "ref_block_id": "block-1",
        })
        .to_string(),
    )
}

/// A conformant Library event.
pub fn valid_library() -> UnsignedEvent {
    UnsignedEvent::new(
        AUTHOR,
        CREATED_AT,
        EventKind::Library,
        vec![
            Tag::new("d", "lib-1"),
            Tag::new("title", "the library"),
            Tag::new("a", book_coordinate()),
            Tag::new("a", block_coordinate()),
            Tag::new("p", AUTHOR.to_hex()),
            Tag::new("p", CLOCK.to_hex()),
        ],
        json!({
            "name": "the library",
            "description": "Books published on Nostr. Read by citizens.",
            "books": [book_coordinate()],
            "founder_pubkey": AUTHOR.to_hex(),
            "protocol_version": "0.1.0",
            "ref_library_pubkey": AUTHOR.to_hex(),
            "ref_library_id": "lib-1",
            "book_count": 1,
            "chapter_count": 0,
            "reader_count": 0,
            "ref_clock_pubkey": CLOCK.to_hex(),
            "ref_block_id": "block-1",
        })
        .to_string(),
    )
}

/// A conformant Library Entry event, filed by [`READER`].
pub fn valid_library_entry() -> UnsignedEvent {
    let library = Coordinate::new(EventKind::Library, READER, "lib-r").to_string();
    UnsignedEvent::new(
        READER,
        CREATED_AT,
        EventKind::LibraryEntry,
        vec![
            Tag::new("d", format!("lib-r:{}", book_coordinate())),
            Tag::new("a", book_coordinate()),
            Tag::new("a", library),
            Tag::new("p", READER.to_hex()),
            Tag::new("p", AUTHOR.to_hex()),
        ],
        json!({
            "read_status": "reading",
            "added_at": CREATED_AT,
            "ref_library_owner_pubkey": READER.to_hex(),
            "ref_library_id": "lib-r",
            "ref_book_coordinate": book_coordinate(),
            "ref_book_pubkey": AUTHOR.to_hex(),
            "ref_book_id": "book-1",
            "ref_block_id": "block-1",
        })
        .to_string(),
    )
}

/// Every vector, conformant ones first.
pub fn all_vectors() -> Vec<ValidationVector> {
    let v = |name, event, valid, reason: &str| ValidationVector {
        name,
        event,
        valid,
        reason: reason.to_string(),
    };

    vec![
        v("conformant book", valid_book(), true, "Valid Book event"),
        v("conformant library", valid_library(), true, "Valid Library event"),
        v(
            "conformant library entry",
            valid_library_entry(),
            true,
            "Valid Library Entry event",
        ),
        v(
            "book without d tag",
            without_tag(valid_book(), "d"),
            false,
            "Missing 'd' tag (book identifier)",
        ),
        v(
            "book without author p tag",
            without_tag(valid_book(), "p"),
            false,
            "Missing required 'p' tag (author pubkey)",
        ),
        v(
            "book impersonating another author",
            with_content(valid_book(), |c| {
                c.insert("ref_book_pubkey".into(), json!(READER.to_hex()));
            }),
            false,
            "ref_book_pubkey must match event's pubkey (author identity)",
        ),
        v(
            "book without chapters",
            with_content(valid_book(), |c| {
                c.remove("chapters");
            }),
            false,
            "Content must include 'chapters' array",
        ),
        v(
            "library missing founder",
            with_content(valid_library(), |c| {
                c.remove("founder_pubkey");
            }),
            false,
            "Content must include 'founder_pubkey'",
        ),
        v(
            "library without block coordinate",
            without_tag(valid_library(), "a"),
            false,
            "Missing block coordinate 'a' tag (format: 38808:<clock_pubkey>:<block_id>)",
        ),
        v(
            "library with non-JSON content",
            UnsignedEvent {
                content: "not json".into(),
                ..valid_library()
            },
            false,
            "Content must be valid JSON",
        ),
        v(
            "library entry without library coordinate",
            {
                let mut ev = valid_library_entry();
                ev.tags.retain(|t| !(t.name() == Some("a") && t.value().is_some_and(|a| a.starts_with("38890:"))));
                ev
            },
            false,
            "Missing library coordinate 'a' tag (format: 38890:<library_owner_pubkey>:<library_id>)",
        ),
        v(
            "library entry with zero added_at",
            with_content(valid_library_entry(), |c| {
                c.insert("added_at".into(), json!(0));
            }),
            true,
            "Valid Library Entry event",
        ),
        v(
            "unknown kind",
            UnsignedEvent {
                kind: 1,
                ..valid_book()
            },
            false,
            "Unknown Ketab Protocol kind: 1",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketab_core::validate_event;

    #[test]
    fn test_all_vectors() {
        for vector in all_vectors() {
            let result = validate_event(&vector.event);
            assert_eq!(result.valid, vector.valid, "vector '{}': {}", vector.name, result.reason);
            assert_eq!(result.reason, vector.reason, "vector '{}'", vector.name);
        }
    }
}
