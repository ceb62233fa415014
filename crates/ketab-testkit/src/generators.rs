//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ketab_core::{Coordinate, EventKind, Keypair, PublicKey, Signer, Tag, UnsignedEvent};

use crate::fixtures::{SampleAct, SampleBook, SampleChapter, SampleUnit};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random public key. Not necessarily a valid curve point.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    any::<[u8; 32]>().prop_map(PublicKey::from_bytes)
}

pub fn event_kind() -> impl Strategy<Value = EventKind> {
    prop_oneof![
        Just(EventKind::Deletion),
        Just(EventKind::Chapter),
        Just(EventKind::Block),
        Just(EventKind::Library),
        Just(EventKind::Book),
        Just(EventKind::LibraryEntry),
        Just(EventKind::Unit),
    ]
}

/// Identifiers are free-form and may contain the delimiter.
pub fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:_-]{0,40}".prop_map(String::from)
}

pub fn coordinate() -> impl Strategy<Value = Coordinate> {
    (event_kind(), public_key(), identifier())
        .prop_map(|(kind, author, id)| Coordinate::new(kind, author, id))
}

/// Unit body text with no scene header and no surrounding whitespace.
pub fn body() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 .,\n]{0,80}[A-Za-z.]"
}

/// An unsigned event authored by `keypair`, with arbitrary tags and content.
pub fn unsigned_event_for(keypair: Keypair) -> impl Strategy<Value = UnsignedEvent> {
    let author = keypair.public_key();
    (
        0i64..=2_000_000_000,
        event_kind(),
        prop::collection::vec(("[a-z]{1,2}", "[ -~]{0,20}"), 0..5),
        "[ -~]{0,200}",
    )
        .prop_map(move |(created_at, kind, tags, content)| {
            let tags = tags.into_iter().map(|(n, v)| Tag::new(n, v)).collect();
            UnsignedEvent::new(author, created_at, kind, tags, content)
        })
}

/// A small random book: one to two acts, one to three chapters each.
pub fn sample_book() -> impl Strategy<Value = SampleBook> {
    let unit = ("[A-Z][a-z]{0,10}", body());
    let chapter = ("[A-Z][a-z ]{0,15}", prop::collection::vec(unit, 1..4));
    let act = ("[A-Z][a-z]{0,10}", prop::collection::vec(chapter, 1..4));

    (
        "[A-Z][a-z ]{0,20}",
        prop::collection::vec(act, 1..3),
    )
        .prop_map(|(title, acts)| {
            let mut next = 0u32;
            let acts = acts
                .into_iter()
                .map(|(act_title, chapters)| SampleAct {
                    title: act_title,
                    chapters: chapters
                        .into_iter()
                        .map(|(chapter_title, units)| {
                            next += 1;
                            let number = format!("{next:02}");
                            SampleChapter {
                                units: units
                                    .into_iter()
                                    .enumerate()
                                    .map(|(i, (unit_title, body))| SampleUnit {
                                        title: unit_title,
                                        id: format!("unit-{number}-{i}"),
                                        body,
                                    })
                                    .collect(),
                                id: format!("chapter-{number}"),
                                title: chapter_title,
                                discussion_id: None,
                                number,
                            }
                        })
                        .collect(),
                })
                .collect();

            SampleBook {
                slug: title.to_lowercase().replace(' ', "-"),
                title,
                id: "generated-book".into(),
                author: "Generated Author".into(),
                description: "Generated.".into(),
                summary: None,
                image: None,
                acts,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_event_id_deterministic(event in keypair().prop_flat_map(unsigned_event_for)) {
            prop_assert_eq!(event.compute_id().unwrap(), event.compute_id().unwrap());
        }

        #[test]
        fn test_signed_events_verify(
            (kp, event) in keypair().prop_flat_map(|kp| (Just(kp.clone()), unsigned_event_for(kp)))
        ) {
            let signed = kp.sign_event(event).unwrap();
            prop_assert!(signed.verify().is_ok());
        }

        #[test]
        fn test_sample_book_numbers_are_unique(book in sample_book()) {
            let mut numbers: Vec<&str> = book.chapters().map(|c| c.number.as_str()).collect();
            let total = numbers.len();
            numbers.dedup();
            prop_assert_eq!(numbers.len(), total);
        }
    }
}
