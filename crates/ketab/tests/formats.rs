//! Both source generations normalize to the same book and the same events.

use proptest::prelude::*;
use tempfile::TempDir;

use ketab::source::Book;
use ketab::Encoder;
use ketab_testkit::generators::sample_book;
use ketab_testkit::BookFixture;

#[test]
fn test_legacy_and_unified_are_equivalent() {
    let legacy = BookFixture::legacy();
    let unified = BookFixture::unified();

    let from_legacy = Book::load(legacy.root()).unwrap();
    let from_unified = Book::load(unified.root()).unwrap();

    assert_eq!(from_legacy, from_unified);
    assert_eq!(from_legacy, legacy.sample.expected());
}

#[test]
fn test_equivalent_books_encode_identically() {
    let legacy = Book::load(BookFixture::legacy().root()).unwrap();
    let unified = Book::load(BookFixture::unified().root()).unwrap();
    let encoder = Encoder::new(BookFixture::empty().public_key(), 1_700_000_000);
    let selected = legacy.chapter_numbers();

    assert_eq!(
        encoder.book(&legacy, &selected).unwrap(),
        encoder.book(&unified, &selected).unwrap()
    );
    for (a, b) in legacy.loaded_chapters().zip(unified.loaded_chapters()) {
        assert_eq!(encoder.chapter(&legacy, a), encoder.chapter(&unified, b));
    }
}

#[test]
fn test_discussion_ids_survive_normalization() {
    let book = Book::load(BookFixture::unified().root()).unwrap();
    let with_thread: Vec<&str> = book
        .chapters()
        .filter(|c| c.discussion_id.is_some())
        .map(|c| c.number.as_str())
        .collect();
    assert_eq!(with_thread, vec!["02"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_generated_books_are_equivalent(sample in sample_book()) {
        let legacy = TempDir::new().unwrap();
        let unified = TempDir::new().unwrap();
        sample.write_legacy(legacy.path()).unwrap();
        sample.write_unified(unified.path()).unwrap();

        let from_legacy = Book::load(legacy.path()).unwrap();
        let from_unified = Book::load(unified.path()).unwrap();

        prop_assert_eq!(&from_legacy, &from_unified);
        prop_assert_eq!(from_legacy, sample.expected());
    }
}
