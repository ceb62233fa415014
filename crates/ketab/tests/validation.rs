//! Validator behaviour on hand-built vectors and on encoder output.

use proptest::prelude::*;
use tempfile::TempDir;

use ketab::core::{validate_as, EventKind, Keypair, Signer};
use ketab::source::Book;
use ketab::{validate_event, BlockAnchor, Coordinate, Encoder, EntryOptions, LibraryOptions};
use ketab_testkit::generators::{coordinate, sample_book};
use ketab_testkit::vectors::{self, all_vectors};

#[test]
fn test_rejection_table() {
    for vector in all_vectors() {
        let result = validate_event(&vector.event);
        assert_eq!(
            (result.valid, result.reason.as_str()),
            (vector.valid, vector.reason.as_str()),
            "vector '{}'",
            vector.name
        );
    }
}

#[test]
fn test_validate_as_wrong_kind() {
    let result = validate_as(&vectors::valid_book(), EventKind::LibraryEntry);
    assert!(!result.valid);
    assert_eq!(
        result.reason,
        "Expected kind 38892 for Library Entry event, got 38891"
    );
}

#[test]
fn test_signed_event_validates_like_unsigned() {
    let keypair = Keypair::from_seed(&[0x11; 32]);
    let mut event = vectors::valid_book();
    event.pubkey = keypair.public_key();
    let signed = keypair.sign_event(event).unwrap();

    // The content still names the vector author.
    assert_eq!(
        signed.validate().reason,
        "ref_book_pubkey must match event's pubkey (author identity)"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_coordinate_round_trip(c in coordinate()) {
        let parsed: Coordinate = c.to_string().parse().unwrap();
        prop_assert_eq!(parsed, c);
    }

    #[test]
    fn test_anchored_encoder_output_is_valid(sample in sample_book(), seed in any::<[u8; 32]>()) {
        let dir = TempDir::new().unwrap();
        sample.write_unified(dir.path()).unwrap();
        let book = Book::load(dir.path()).unwrap();

        let keypair = Keypair::from_seed(&seed);
        let encoder = Encoder::new(keypair.public_key(), 1_700_000_000)
            .with_relay_hint("wss://relay.example")
            .with_anchor(BlockAnchor {
                clock_pubkey: Keypair::from_seed(&[0xc1; 32]).public_key(),
                block_id: "block-1".into(),
            });

        let mut events = Vec::new();
        for chapter in book.loaded_chapters() {
            for unit in &chapter.units {
                events.push(encoder.unit(unit).unwrap());
            }
        }
        events.push(encoder.book(&book, &book.chapter_numbers()).unwrap());
        events.push(encoder.library(&book, &LibraryOptions::default(), book.chapter_numbers().len()).unwrap());
        events.push(encoder.library_entry(&encoder.book_coordinate(&book), &EntryOptions::default()).unwrap());

        for event in events {
            let result = validate_event(&event);
            prop_assert!(result.valid, "kind {}: {}", event.kind, result.reason);
            let signed = keypair.sign_event(event).unwrap();
            prop_assert!(signed.verify().is_ok());
        }
    }
}
