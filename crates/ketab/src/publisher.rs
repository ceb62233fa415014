//! Publication workflows: sign encoder output and deliver it.
//!
//! A [`Publisher`] pairs a [`Signer`] with a [`Transport`] and a relay
//! configuration. Each workflow walks its events one at a time; a signing or
//! delivery failure is recorded in the report and never aborts the run.

use ketab_core::{
    validate_event, Coordinate, EventKind, SignedEvent, Signer, UnsignedEvent,
};
use ketab_relay::{deliver, RelayConfig, Transport};
use ketab_source::{Book, Chapter, DiscussionRef};

use crate::encoder::{
    unique_chapters, BlockAnchor, Encoder, EntryOptions, LibraryOptions,
    DEFAULT_DELETION_REASON,
};
use crate::error::Result;

/// Options for a full publication run.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Chapter numbers to publish. `None` means every loaded chapter.
    pub chapters: Option<Vec<String>>,
    /// Publish units but no chapter events.
    pub skip_chapters: bool,
    /// Sign everything, deliver nothing.
    pub dry_run: bool,
    pub library: LibraryOptions,
    pub anchor: Option<BlockAnchor>,
    /// Event timestamp. Defaults to now.
    pub created_at: Option<i64>,
}

/// What became of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    SignFailed(String),
    DryRun,
    Delivered { accepted: usize, failed: usize },
    /// Signed, but no endpoint accepted it.
    Undelivered,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::DryRun | Self::Delivered { .. })
    }
}

#[derive(Debug, Clone)]
pub struct EventOutcome {
    pub kind: u32,
    /// Short description for display, e.g. `chapter 03`.
    pub label: String,
    pub event: Option<SignedEvent>,
    pub status: OutcomeStatus,
}

/// Counts and per-event outcomes of a workflow.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub outcomes: Vec<EventOutcome>,
    /// Set by runs that publish a book event.
    pub book_coordinate: Option<Coordinate>,
}

impl PublishReport {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    /// Outcomes for events of `kind`.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &EventOutcome> {
        self.outcomes.iter().filter(move |o| o.kind == kind.to_u32())
    }

    fn record(&mut self, outcome: EventOutcome) {
        self.attempted += 1;
        if outcome.status.is_success() {
            self.succeeded += 1;
        }
        self.outcomes.push(outcome);
    }
}

/// Signs and delivers Ketab events for one identity.
pub struct Publisher<S: Signer, T: Transport> {
    signer: S,
    transport: T,
    relays: RelayConfig,
}

impl<S: Signer, T: Transport> Publisher<S, T> {
    pub fn new(signer: S, transport: T, relays: RelayConfig) -> Self {
        Self {
            signer,
            transport,
            relays,
        }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn relays(&self) -> &RelayConfig {
        &self.relays
    }

    fn encoder(&self, created_at: Option<i64>, anchor: Option<&BlockAnchor>) -> Encoder {
        let mut encoder = Encoder::new(
            self.signer.public_key(),
            created_at.unwrap_or_else(now_secs),
        );
        if let Some(hint) = self.relays.relay_hint() {
            encoder = encoder.with_relay_hint(hint);
        }
        if let Some(anchor) = anchor {
            encoder = encoder.with_anchor(anchor.clone());
        }
        encoder
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workflows
    // ─────────────────────────────────────────────────────────────────────────

    /// Publish a book: units, then chapters, then the book, then the library.
    pub async fn publish(&self, book: &Book, options: &PublishOptions) -> Result<PublishReport> {
        let encoder = self.encoder(options.created_at, options.anchor.as_ref());
        let selected = options
            .chapters
            .as_deref()
            .map(unique_chapters)
            .unwrap_or_else(|| book.chapter_numbers());

        let chapters: Vec<&Chapter> = selected
            .iter()
            .filter_map(|number| {
                let found = book.chapter(number);
                if found.is_none() {
                    tracing::warn!(chapter = %number, "chapter not loaded, skipping");
                }
                found
            })
            .collect();

        tracing::info!(
            book = %book.title,
            chapters = chapters.len(),
            dry_run = options.dry_run,
            "publishing"
        );

        let mut report = PublishReport::default();

        for chapter in &chapters {
            for unit in &chapter.units {
                let event = encoder.unit(unit)?;
                let label = format!("unit {}#{} {}", chapter.number, unit.ordinal, unit.title);
                report.record(self.emit(event, label, options.dry_run).await);
            }
        }

        if options.skip_chapters {
            tracing::info!("chapter events skipped");
        } else {
            for chapter in &chapters {
                let event = encoder.chapter(book, chapter);
                let label = format!("chapter {}", chapter.number);
                report.record(self.emit(event, label, options.dry_run).await);
            }
        }

        let book_event = encoder.book(book, &selected)?;
        report.record(
            self.emit(book_event, format!("book {}", book.title), options.dry_run)
                .await,
        );

        let library_event = encoder.library(book, &options.library, chapters.len())?;
        report.record(
            self.emit(
                library_event,
                format!("library {}", options.library.name),
                options.dry_run,
            )
            .await,
        );

        report.book_coordinate = Some(encoder.book_coordinate(book));
        tracing::info!(
            succeeded = report.succeeded,
            attempted = report.attempted,
            "publication finished"
        );
        Ok(report)
    }

    /// Publish only the book event, referencing every loaded chapter.
    ///
    /// Used after the source document changed without touching chapter
    /// content.
    pub async fn publish_book(
        &self,
        book: &Book,
        options: &PublishOptions,
    ) -> Result<PublishReport> {
        let encoder = self.encoder(options.created_at, options.anchor.as_ref());
        let selected = options
            .chapters
            .clone()
            .unwrap_or_else(|| book.chapter_numbers());

        let mut report = PublishReport::default();
        let event = encoder.book(book, &selected)?;
        report.record(
            self.emit(event, format!("book {}", book.title), options.dry_run)
                .await,
        );
        report.book_coordinate = Some(encoder.book_coordinate(book));
        Ok(report)
    }

    /// Request deletion of each discussion thread, one event per target.
    pub async fn delete_threads(&self, targets: &[DiscussionRef], dry_run: bool) -> PublishReport {
        let encoder = self.encoder(None, None);
        let mut report = PublishReport::default();

        for target in targets {
            let event = encoder.deletion(
                std::slice::from_ref(&target.discussion_id),
                DEFAULT_DELETION_REASON,
            );
            let label = format!("discussion for chapter {}", target.chapter);
            report.record(self.emit(event, label, dry_run).await);
        }

        report
    }

    /// Add `book` to the signer's library.
    pub async fn add_to_library(
        &self,
        book: &Coordinate,
        options: &EntryOptions,
        anchor: Option<&BlockAnchor>,
        dry_run: bool,
    ) -> Result<PublishReport> {
        let encoder = self.encoder(None, anchor);
        let event = encoder.library_entry(book, options)?;

        let mut report = PublishReport::default();
        let label = format!("library entry {}", book.identifier);
        report.record(self.emit(event, label, dry_run).await);
        report.book_coordinate = Some(book.clone());
        Ok(report)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign one event and, unless `dry_run`, deliver it to every endpoint.
    async fn emit(&self, event: UnsignedEvent, label: String, dry_run: bool) -> EventOutcome {
        let kind = event.kind;

        // Chapters and deletions have no schema.
        if matches!(
            event.event_kind(),
            Some(EventKind::Library | EventKind::Book | EventKind::LibraryEntry | EventKind::Unit)
        ) {
            let validation = validate_event(&event);
            if !validation.valid {
                tracing::warn!(
                    label = %label,
                    reason = %validation.reason,
                    "event does not satisfy its schema"
                );
            }
        }

        let signed = match self.signer.sign_event(event) {
            Ok(signed) => signed,
            Err(e) => {
                tracing::warn!(label = %label, "signing failed: {}", e);
                return EventOutcome {
                    kind,
                    label,
                    event: None,
                    status: OutcomeStatus::SignFailed(e.to_string()),
                };
            }
        };

        let hex = signed.id.to_hex();
        let id = &hex[..12];

        let status = if dry_run {
            tracing::info!(label = %label, id, "signed (dry run)");
            OutcomeStatus::DryRun
        } else {
            let delivery = deliver(&self.transport, &self.relays.endpoints, &signed).await;
            if delivery.any_accepted() {
                OutcomeStatus::Delivered {
                    accepted: delivery.accepted(),
                    failed: delivery.failed(),
                }
            } else {
                tracing::warn!(label = %label, id, "no relay accepted the event");
                OutcomeStatus::Undelivered
            }
        };

        EventOutcome {
            kind,
            label,
            event: Some(signed),
            status,
        }
    }
}

/// Current Unix time in seconds.
pub fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
