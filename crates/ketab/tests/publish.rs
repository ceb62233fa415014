//! Publication workflows against the in-memory transport.

use ketab::core::{validate_event, BookContent, EventKind, Keypair, SignError, Signer};
use ketab::relay::memory::MemoryTransport;
use ketab::relay::RelayConfig;
use ketab::source::{deletion_targets, Book};
use ketab::{
    BlockAnchor, Coordinate, EntryOptions, KetabError, OutcomeStatus, PublicKey, PublishOptions,
    Publisher, SchnorrKeypair, SignedEvent, UnsignedEvent,
};
use ketab_testkit::BookFixture;

const RELAYS: [&str; 3] = ["wss://one.example", "wss://two.example", "wss://three.example"];

fn anchor() -> BlockAnchor {
    BlockAnchor {
        clock_pubkey: PublicKey::from_bytes([0x77; 32]),
        block_id: "block-840000".into(),
    }
}

fn publisher(transport: MemoryTransport) -> (Publisher<Keypair, MemoryTransport>, Book) {
    let fixture = BookFixture::unified();
    let book = Book::load(fixture.root()).unwrap();
    let publisher = Publisher::new(fixture.keypair.clone(), transport, RelayConfig::new(RELAYS));
    (publisher, book)
}

fn options() -> PublishOptions {
    PublishOptions {
        anchor: Some(anchor()),
        created_at: Some(1_700_000_000),
        ..Default::default()
    }
}

fn kinds(events: &[SignedEvent]) -> Vec<u32> {
    events.iter().map(|e| e.kind()).collect()
}

#[tokio::test]
async fn test_publish_order_and_counts() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let report = publisher.publish(&book, &options()).await.unwrap();

    // 6 units, 3 chapters, book, library.
    assert_eq!(report.attempted, 11);
    assert_eq!(report.succeeded, 11);
    assert_eq!(report.failed(), 0);

    let delivered = publisher.transport().accepted_by(RELAYS[0]);
    let mut expected = vec![38893; 6];
    expected.extend([30023; 3]);
    expected.extend([38891, 38890]);
    assert_eq!(kinds(&delivered), expected);

    let coordinate = report.book_coordinate.unwrap();
    assert_eq!(coordinate.kind, 38891);
    assert_eq!(coordinate.author, publisher.signer().public_key());
    assert_eq!(coordinate.identifier, book.id);
}

#[tokio::test]
async fn test_published_events_verify_and_validate() {
    let (publisher, book) = publisher(MemoryTransport::new());
    publisher.publish(&book, &options()).await.unwrap();

    for event in publisher.transport().accepted_by(RELAYS[1]) {
        assert!(event.verify().is_ok());
        if event.kind() != 30023 {
            let v = event.validate();
            assert!(v.valid, "kind {}: {}", event.kind(), v.reason);
        }
    }
}

#[tokio::test]
async fn test_schnorr_signed_publication_verifies() {
    let fixture = BookFixture::legacy();
    let book = Book::load(fixture.root()).unwrap();
    let keypair = SchnorrKeypair::from_hex(&"2a".repeat(32)).unwrap();
    let publisher = Publisher::new(keypair, MemoryTransport::new(), RelayConfig::new(RELAYS));

    let report = publisher.publish(&book, &options()).await.unwrap();
    assert_eq!(report.succeeded, report.attempted);

    let author = publisher.signer().public_key();
    for event in publisher.transport().accepted_by(RELAYS[2]) {
        assert_eq!(event.pubkey(), &author);
        assert!(event.pubkey().verify_schnorr(event.id.as_bytes(), &event.sig).is_ok());
        assert!(event.verify().is_ok());
    }
}

#[tokio::test]
async fn test_selected_chapters_gate_units_and_references() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let options = PublishOptions {
        chapters: Some(vec!["02".into()]),
        ..options()
    };
    let report = publisher.publish(&book, &options).await.unwrap();

    // 2 units, 1 chapter, book, library.
    assert_eq!(report.attempted, 5);
    assert_eq!(report.of_kind(EventKind::Unit).count(), 2);

    let book_event = report
        .of_kind(EventKind::Book)
        .next()
        .and_then(|o| o.event.clone())
        .unwrap();
    let references: Vec<&str> = book_event.event.tag_values("a").collect();
    assert_eq!(references.len(), 1);
    assert!(references[0].ends_with(":chapter-02-uuid"));

    let content: BookContent = serde_json::from_str(&book_event.event.content).unwrap();
    for entry in content.acts.iter().flat_map(|a| a.chapters.iter()) {
        assert_eq!(entry.ketabs.is_empty(), entry.number != "02");
    }
}

#[tokio::test]
async fn test_unknown_chapter_is_skipped() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let options = PublishOptions {
        chapters: Some(vec!["01".into(), "99".into()]),
        ..options()
    };
    let report = publisher.publish(&book, &options).await.unwrap();
    assert_eq!(report.of_kind(EventKind::Chapter).count(), 1);
    assert_eq!(report.attempted, 5);
}

#[tokio::test]
async fn test_repeated_chapter_selection_publishes_once() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let options = PublishOptions {
        chapters: Some(vec!["01".into(), "01".into(), "02".into(), "01".into()]),
        ..options()
    };
    let report = publisher.publish(&book, &options).await.unwrap();

    // 4 units, 2 chapters, book, library.
    assert_eq!(report.attempted, 8);
    assert_eq!(report.of_kind(EventKind::Unit).count(), 4);
    assert_eq!(report.of_kind(EventKind::Chapter).count(), 2);

    let book_event = report
        .of_kind(EventKind::Book)
        .next()
        .and_then(|o| o.event.clone())
        .unwrap();
    assert_eq!(book_event.event.tag_values("a").count(), 2);
    let content: BookContent = serde_json::from_str(&book_event.event.content).unwrap();
    assert_eq!(content.chapters.len(), 2);
    assert_eq!(content.chapter_count, 2);
}

#[tokio::test]
async fn test_units_only_mode() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let options = PublishOptions {
        skip_chapters: true,
        ..options()
    };
    let report = publisher.publish(&book, &options).await.unwrap();
    assert_eq!(report.of_kind(EventKind::Chapter).count(), 0);
    assert_eq!(report.of_kind(EventKind::Unit).count(), 6);
    assert_eq!(report.of_kind(EventKind::Book).count(), 1);
}

#[tokio::test]
async fn test_dry_run_delivers_nothing() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let options = PublishOptions {
        dry_run: true,
        ..options()
    };
    let report = publisher.publish(&book, &options).await.unwrap();

    assert!(publisher.transport().attempts().is_empty());
    assert_eq!(report.succeeded, report.attempted);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == OutcomeStatus::DryRun && o.event.is_some()));
}

#[tokio::test]
async fn test_failing_endpoint_does_not_stop_delivery() {
    let (publisher, book) = publisher(MemoryTransport::new().failing_on(RELAYS[1]));
    let report = publisher.publish(&book, &options()).await.unwrap();

    assert_eq!(report.succeeded, report.attempted);
    assert_eq!(
        publisher.transport().attempts().len(),
        report.attempted * RELAYS.len()
    );
    assert_eq!(
        publisher.transport().accepted_by(RELAYS[2]).len(),
        report.attempted
    );
    assert!(report.outcomes.iter().all(|o| o.status
        == OutcomeStatus::Delivered {
            accepted: 2,
            failed: 1
        }));
}

#[tokio::test]
async fn test_no_accepting_endpoint_counts_as_failure() {
    let transport = RELAYS
        .iter()
        .fold(MemoryTransport::new(), |t, r| t.failing_on(*r));
    let (publisher, book) = publisher(transport);
    let report = publisher.publish(&book, &options()).await.unwrap();

    assert_eq!(report.succeeded, 0);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == OutcomeStatus::Undelivered));
}

/// A signer that refuses everything.
struct OfflineSigner(PublicKey);

impl Signer for OfflineSigner {
    fn public_key(&self) -> PublicKey {
        self.0
    }

    fn sign_event(&self, _event: UnsignedEvent) -> Result<SignedEvent, SignError> {
        Err(SignError::Unavailable("signer offline".into()))
    }
}

#[tokio::test]
async fn test_signing_failures_are_counted() {
    let fixture = BookFixture::legacy();
    let book = Book::load(fixture.root()).unwrap();
    let publisher = Publisher::new(
        OfflineSigner(fixture.public_key()),
        MemoryTransport::new(),
        RelayConfig::new(RELAYS),
    );

    let report = publisher.publish(&book, &options()).await.unwrap();
    assert_eq!(report.attempted, 11);
    assert_eq!(report.succeeded, 0);
    assert!(matches!(report.outcomes[0].status, OutcomeStatus::SignFailed(_)));
    assert!(publisher.transport().attempts().is_empty());
}

#[tokio::test]
async fn test_delete_threads() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let targets = deletion_targets(&book, &[]);
    assert_eq!(targets.len(), 1);

    let report = publisher.delete_threads(&targets, false).await;
    assert_eq!(report.succeeded, 1);

    let deletion = &publisher.transport().accepted_by(RELAYS[0])[0];
    assert_eq!(deletion.kind(), 5);
    assert_eq!(
        deletion.event.tag_value("e"),
        Some(targets[0].discussion_id.as_str())
    );
}

#[tokio::test]
async fn test_publish_book_only() {
    let (publisher, book) = publisher(MemoryTransport::new());
    let report = publisher.publish_book(&book, &options()).await.unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(kinds(&publisher.transport().accepted_by(RELAYS[0])), vec![38891]);
}

#[tokio::test]
async fn test_add_to_library() {
    let (publisher, _) = publisher(MemoryTransport::new());
    let author = Keypair::from_seed(&[9u8; 32]).public_key();
    let book = Coordinate::new(EventKind::Book, author, "someone-elses-book");

    let report = publisher
        .add_to_library(&book, &EntryOptions::default(), None, false)
        .await
        .unwrap();
    assert_eq!(report.succeeded, 1);

    let entry = &publisher.transport().accepted_by(RELAYS[0])[0];
    assert_eq!(entry.kind(), 38892);
    let p_tags: Vec<&str> = entry.event.tag_values("p").collect();
    assert_eq!(p_tags[0], publisher.signer().public_key().to_hex());
    assert_eq!(p_tags[1], author.to_hex());
    // Without an anchor the entry lacks ref_block_id.
    assert!(!validate_event(&entry.event).valid);
}

#[tokio::test]
async fn test_add_to_library_rejects_non_book() {
    let (publisher, _) = publisher(MemoryTransport::new());
    let chapter = Coordinate::new(EventKind::Chapter, publisher.signer().public_key(), "c");

    let result = publisher
        .add_to_library(&chapter, &EntryOptions::default(), None, false)
        .await;
    assert!(matches!(result, Err(KetabError::NotABook(30023))));
    assert!(publisher.transport().attempts().is_empty());
}
