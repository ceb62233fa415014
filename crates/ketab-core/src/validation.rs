//! Schema validation for incoming events.
//!
//! Validation is state-free and driven by a per-kind [`Schema`] table. Checks
//! run in a fixed order and the first failure wins:
//!
//! 1. Kind match
//! 2. Identity (`d`) tag present and non-empty
//! 3. Required `a` tags, matched by coordinate-kind prefix
//! 4. Minimum number of `p` tags
//! 5. Content parses as a JSON object
//! 6. Required string, numeric and array fields
//! 7. Cross-field identity check

use serde_json::{Map, Value};

use crate::event::UnsignedEvent;
use crate::kind::EventKind;

/// Binary accept/reject decision with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub reason: String,
}

impl Validation {
    fn ok(kind: EventKind) -> Self {
        Self {
            valid: true,
            reason: format!("Valid {} event", kind.label()),
        }
    }

    fn reject(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }
}

/// A required `a` tag: the coordinate kind it must start with, and the
/// rejection reason when absent.
struct RequiredRef {
    kind: EventKind,
    missing: &'static str,
}

struct Schema {
    kind: EventKind,
    /// What the `d` tag identifies, for the rejection reason.
    identity: &'static str,
    refs: &'static [RequiredRef],
    min_p: usize,
    missing_p: &'static str,
    strings: &'static [&'static str],
    /// String fields that must be present but may be empty.
    texts: &'static [&'static str],
    numbers: &'static [&'static str],
    arrays: &'static [&'static str],
    /// `ref_book_pubkey` must equal the event pubkey.
    author_bound: bool,
}

const LIBRARY: Schema = Schema {
    kind: EventKind::Library,
    identity: "library identifier",
    refs: &[RequiredRef {
        kind: EventKind::Block,
        missing: "Missing block coordinate 'a' tag (format: 38808:<clock_pubkey>:<block_id>)",
    }],
    min_p: 2,
    missing_p: "Missing required 'p' tags (need library pubkey and clock pubkey)",
    strings: &[
        "name",
        "description",
        "founder_pubkey",
        "protocol_version",
        "ref_library_pubkey",
        "ref_library_id",
        "ref_clock_pubkey",
        "ref_block_id",
    ],
    texts: &[],
    numbers: &["book_count", "reader_count", "chapter_count"],
    arrays: &[],
    author_bound: false,
};

const BOOK: Schema = Schema {
    kind: EventKind::Book,
    identity: "book identifier",
    refs: &[],
    min_p: 1,
    missing_p: "Missing required 'p' tag (author pubkey)",
    strings: &[
        "title",
        "description",
        "author",
        "ref_book_pubkey",
        "ref_book_id",
        "ref_block_id",
    ],
    texts: &[],
    numbers: &["published_at", "chapter_count"],
    arrays: &["chapters"],
    author_bound: true,
};

const LIBRARY_ENTRY: Schema = Schema {
    kind: EventKind::LibraryEntry,
    identity: "entry identifier",
    refs: &[
        RequiredRef {
            kind: EventKind::Book,
            missing: "Missing book coordinate 'a' tag (format: 38891:<author_pubkey>:<book_id>)",
        },
        RequiredRef {
            kind: EventKind::Library,
            missing:
                "Missing library coordinate 'a' tag (format: 38890:<library_owner_pubkey>:<library_id>)",
        },
    ],
    min_p: 2,
    missing_p: "Missing required 'p' tags (need library owner pubkey and book author pubkey)",
    strings: &[
        "ref_library_owner_pubkey",
        "ref_library_id",
        "ref_book_coordinate",
        "ref_book_pubkey",
        "ref_book_id",
        "ref_block_id",
    ],
    texts: &[],
    numbers: &["added_at"],
    arrays: &[],
    author_bound: false,
};

const UNIT: Schema = Schema {
    kind: EventKind::Unit,
    identity: "unit identifier",
    refs: &[],
    min_p: 0,
    missing_p: "",
    strings: &["title"],
    texts: &["body"],
    numbers: &["index", "ord"],
    arrays: &[],
    author_bound: false,
};

fn schema_for(kind: EventKind) -> Option<&'static Schema> {
    match kind {
        EventKind::Library => Some(&LIBRARY),
        EventKind::Book => Some(&BOOK),
        EventKind::LibraryEntry => Some(&LIBRARY_ENTRY),
        EventKind::Unit => Some(&UNIT),
        _ => None,
    }
}

/// Validate an event against the schema of its declared kind.
///
/// Kinds without a schema (including unknown numbers) are rejected.
pub fn validate_event(event: &UnsignedEvent) -> Validation {
    match EventKind::from_u32(event.kind).and_then(schema_for) {
        Some(schema) => check(schema, event),
        None => Validation::reject(format!("Unknown Ketab Protocol kind: {}", event.kind)),
    }
}

/// Validate an event that is expected to be of `kind`.
pub fn validate_as(event: &UnsignedEvent, kind: EventKind) -> Validation {
    match schema_for(kind) {
        Some(schema) => check(schema, event),
        None => Validation::reject(format!("Unknown Ketab Protocol kind: {}", kind.to_u32())),
    }
}

fn check(schema: &Schema, event: &UnsignedEvent) -> Validation {
    if event.kind != schema.kind.to_u32() {
        return Validation::reject(format!(
            "Expected kind {} for {} event, got {}",
            schema.kind.to_u32(),
            schema.kind.label(),
            event.kind
        ));
    }

    if event.tag_value("d").map_or(true, str::is_empty) {
        return Validation::reject(format!("Missing 'd' tag ({})", schema.identity));
    }

    for required in schema.refs {
        let prefix = required.kind.coordinate_prefix();
        if !event.tag_values("a").any(|a| a.starts_with(&prefix)) {
            return Validation::reject(required.missing);
        }
    }

    if event.tag_values("p").count() < schema.min_p {
        return Validation::reject(schema.missing_p);
    }

    let content = match serde_json::from_str::<Map<String, Value>>(&event.content) {
        Ok(map) => map,
        Err(_) => return Validation::reject("Content must be valid JSON"),
    };

    if let Some(reason) = check_fields(schema, &content) {
        return Validation::reject(reason);
    }

    if schema.author_bound {
        let claimed = content.get("ref_book_pubkey").and_then(Value::as_str);
        if claimed != Some(event.pubkey.to_hex().as_str()) {
            return Validation::reject(
                "ref_book_pubkey must match event's pubkey (author identity)",
            );
        }
    }

    Validation::ok(schema.kind)
}

fn check_fields(schema: &Schema, content: &Map<String, Value>) -> Option<String> {
    for field in schema.strings {
        match content.get(*field) {
            None => return Some(format!("Content must include '{field}'")),
            Some(Value::String(s)) if !s.is_empty() => {}
            Some(_) => return Some(format!("Content field '{field}' must be a non-empty string")),
        }
    }

    for field in schema.texts {
        match content.get(*field) {
            None => return Some(format!("Content must include '{field}'")),
            Some(Value::String(_)) => {}
            Some(_) => return Some(format!("Content field '{field}' must be a string")),
        }
    }

    // Zero is a legal value; only presence is required.
    for field in schema.numbers {
        if !content.contains_key(*field) {
            return Some(format!("Content must include '{field}'"));
        }
    }

    for field in schema.arrays {
        match content.get(*field) {
            None => return Some(format!("Content must include '{field}' array")),
            Some(Value::Array(_)) => {}
            Some(_) => return Some(format!("Content field '{field}' must be an array")),
        }
    }

    None
}
