//! # Ketab Testkit
//!
//! Testing utilities for Ketab.
//!
//! ## Overview
//!
//! - **Fixtures**: sample books written to temporary directories in either
//!   source layout
//! - **Generators**: proptest strategies for keys, coordinates, events and
//!   books
//! - **Vectors**: events with known validator verdicts
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ketab_testkit::fixtures::BookFixture;
//! use ketab_source::Book;
//!
//! let fixture = BookFixture::unified();
//! let book = Book::load(fixture.root()).unwrap();
//! assert_eq!(book, fixture.sample.expected());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ketab_testkit::generators::coordinate;
//!
//! proptest! {
//!     #[test]
//!     fn coordinate_round_trip(c in coordinate()) {
//!         prop_assert_eq!(c.to_string().parse::<Coordinate>().unwrap(), c);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{BookFixture, SampleAct, SampleBook, SampleChapter, SampleUnit};
pub use vectors::{all_vectors, ValidationVector};
