//! # Ketab Core
//!
//! Pure primitives for the Ketab protocol: event kinds, coordinates, wire
//! events, content schemas and the schema validator.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over event payloads.
//!
//! ## Key Types
//!
//! - [`EventKind`] - The fixed protocol kind numbers
//! - [`Coordinate`] - `kind:author:identifier` cross-reference
//! - [`UnsignedEvent`] / [`SignedEvent`] - Wire-format events
//! - [`Signer`] - The signing capability, with [`Keypair`] as reference implementation
//! - [`Validation`] - Binary accept/reject decision with a reason
//!
//! ## Validation
//!
//! Every incoming event can be checked with [`validate_event`]. The check is
//! state-free and dispatches on the declared kind.

pub mod content;
pub mod coordinate;
pub mod crypto;
pub mod error;
pub mod event;
pub mod kind;
pub mod types;
pub mod validation;

pub use content::{
    ActEntry, BookContent, ChapterEntry, LibraryContent, LibraryEntryContent, ReadStatus,
    ShapeChapter, ShapeUnit, UnitContent, UnitEntry, BOOK_SCHEMA_VERSION, LIBRARY_DESCRIPTION,
    PROTOCOL_VERSION,
};
pub use coordinate::{Coordinate, COORDINATE_DELIMITER};
pub use crypto::{Keypair, PublicKey, SchnorrKeypair, Signature, Signer};
pub use error::{CoordinateError, CoreError, SignError};
pub use event::{SignedEvent, Tag, UnsignedEvent};
pub use kind::EventKind;
pub use types::EventId;
pub use validation::{validate_as, validate_event, Validation};
