//! # Ketab Source
//!
//! Loads a book directory into the canonical [`Book`] model.
//!
//! ## Overview
//!
//! Two generations of source documents exist on disk:
//!
//! - **Legacy**: `book-metadata.json` lists acts and chapter references, each
//!   chapter directory holds a `chapter-metadata.json` and the unit files, and
//!   an optional `book-shape.json` carries presentational structure.
//! - **Unified**: a single `book.json` embeds the whole tree including every
//!   unit's file path, relative to the book root.
//!
//! The generation is decided once at load time into a [`SourceDocument`], and
//! each variant is normalized through its own typed model.
//!
//! ## Key Types
//!
//! - [`Book`] / [`Act`] / [`Chapter`] / [`Unit`] - The canonical model
//! - [`SourceDocument`] - Tagged union over the two document generations
//! - [`BookStatus`] - Human-readable summary of a book directory

pub mod audit;
pub mod body;
pub mod discussions;
pub mod error;
pub mod layout;
pub mod model;
pub mod normalize;

pub use audit::{audit, status, BookStatus, ChapterStatus};
pub use body::strip_header;
pub use discussions::{clean_discussions, deletion_targets, DiscussionRef};
pub use error::{Result, SourceError};
pub use model::{Act, Book, Chapter, Unit};
pub use normalize::{SourceDocument, SourceFormat};
