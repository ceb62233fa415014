//! # Ketab
//!
//! Publish books as addressable, cross-referencing signed events.
//!
//! ## Overview
//!
//! A book lives on disk as a directory of JSON metadata and plain-text
//! passages. Ketab turns it into a graph of events:
//!
//! - **Units** (38893): one per passage
//! - **Chapters** (30023): compiled chapter text, referencing their units
//! - **Book** (38891): the act/chapter tree, referencing published chapters
//! - **Library** (38890): a collection referencing the book
//! - **Library Entry** (38892): a reader's personal entry for a book
//!
//! Every event is addressed by a coordinate `kind:author:identifier`, so
//! republishing with the same identifiers replaces earlier versions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ketab::{Publisher, PublishOptions};
//! use ketab::core::SchnorrKeypair;
//! use ketab::relay::{RelayConfig, WebSocketTransport};
//! use ketab::source::Book;
//!
//! async fn example() -> ketab::Result<()> {
//!     let book = Book::load("./my-book")?;
//!     let publisher = Publisher::new(
//!         SchnorrKeypair::generate(),
//!         WebSocketTransport::default(),
//!         RelayConfig::new(["wss://relay.example"]),
//!     );
//!     let report = publisher.publish(&book, &PublishOptions::default()).await?;
//!     println!("{}/{} events published", report.succeeded, report.attempted);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ketab::core` - Events, coordinates, signing and validation
//! - `ketab::source` - Source formats and the canonical book model
//! - `ketab::relay` - Relay transports and delivery

pub mod encoder;
pub mod error;
pub mod publisher;

pub use ketab_core as core;
pub use ketab_relay as relay;
pub use ketab_source as source;

pub use encoder::{
    unique_chapters, BlockAnchor, Encoder, EntryOptions, LibraryOptions,
    DEFAULT_DELETION_REASON, DEFAULT_LIBRARY_ID, DEFAULT_LIBRARY_NAME,
};
pub use error::{KetabError, Result};
pub use publisher::{now_secs, EventOutcome, OutcomeStatus, PublishOptions, PublishReport, Publisher};

pub use ketab_core::{
    validate_event, Coordinate, EventKind, Keypair, PublicKey, SchnorrKeypair, SignedEvent,
    Signer, UnsignedEvent, Validation,
};
pub use ketab_source::Book;
