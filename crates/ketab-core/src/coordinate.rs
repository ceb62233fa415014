//! Coordinates: stable cross-references to addressable events.
//!
//! A coordinate is the text `"<kind>:<author_pubkey_hex>:<identifier>"`. It
//! names the latest version of an addressable event by kind, author and
//! `d`-tag value, independent of event ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::PublicKey;
use crate::error::CoordinateError;
use crate::kind::EventKind;

/// Separator between the three coordinate fields.
pub const COORDINATE_DELIMITER: char = ':';

/// A parsed coordinate.
///
/// The identifier is free text and may itself contain `:`. Parsing splits on
/// the first two delimiters only, so `Display` and `parse` round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub kind: u32,
    pub author: PublicKey,
    pub identifier: String,
}

impl Coordinate {
    /// Build a coordinate for a known kind.
    pub fn new(kind: EventKind, author: PublicKey, identifier: impl Into<String>) -> Self {
        Self {
            kind: kind.to_u32(),
            author,
            identifier: identifier.into(),
        }
    }

    /// Parse `"<kind>:<author>:<identifier>"`.
    pub fn parse(s: &str) -> Result<Self, CoordinateError> {
        let mut parts = s.splitn(3, COORDINATE_DELIMITER);
        let (kind, author, identifier) = match (parts.next(), parts.next(), parts.next()) {
            (Some(k), Some(a), Some(i)) => (k, a, i),
            _ => return Err(CoordinateError::Malformed(s.to_string())),
        };

        let kind = kind
            .parse::<u32>()
            .map_err(|_| CoordinateError::InvalidKind(kind.to_string()))?;

        if author.len() != 64 || !author.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoordinateError::InvalidAuthor(author.to_string()));
        }
        let author = PublicKey::from_hex(&author.to_ascii_lowercase())
            .map_err(|_| CoordinateError::InvalidAuthor(author.to_string()))?;

        Ok(Self {
            kind,
            author,
            identifier: identifier.to_string(),
        })
    }

    /// The kind as a protocol enum, if known.
    pub fn event_kind(&self) -> Option<EventKind> {
        EventKind::from_u32(self.kind)
    }

    /// Whether this coordinate points at an event of `kind`.
    pub fn is_kind(&self, kind: EventKind) -> bool {
        self.kind == kind.to_u32()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.kind, COORDINATE_DELIMITER, self.author, COORDINATE_DELIMITER, self.identifier
        )
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn author() -> PublicKey {
        PublicKey::from_bytes([0x11; 32])
    }

    #[test]
    fn test_format() {
        let c = Coordinate::new(EventKind::Book, author(), "my-book");
        assert_eq!(c.to_string(), format!("38891:{}:my-book", "11".repeat(32)));
    }

    #[test]
    fn test_parse_identifier_with_colons() {
        let s = format!("38892:{}:lib-1:38891:{}:book", "11".repeat(32), "22".repeat(32));
        let c = Coordinate::parse(&s).unwrap();
        assert_eq!(c.kind, 38892);
        assert_eq!(c.identifier, format!("lib-1:38891:{}:book", "22".repeat(32)));
        assert_eq!(c.to_string(), s);
    }

    #[test]
    fn test_parse_empty_identifier() {
        let s = format!("38891:{}:", "11".repeat(32));
        let c = Coordinate::parse(&s).unwrap();
        assert_eq!(c.identifier, "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Coordinate::parse("38891:abc"),
            Err(CoordinateError::Malformed(_))
        ));
        assert!(matches!(
            Coordinate::parse(&format!("book:{}:x", "11".repeat(32))),
            Err(CoordinateError::InvalidKind(_))
        ));
        assert!(matches!(
            Coordinate::parse("38891:nothex:x"),
            Err(CoordinateError::InvalidAuthor(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_display_parse_roundtrip(
            kind in any::<u32>(),
            bytes in any::<[u8; 32]>(),
            identifier in ".*",
        ) {
            let c = Coordinate { kind, author: PublicKey::from_bytes(bytes), identifier };
            let parsed = Coordinate::parse(&c.to_string()).unwrap();
            prop_assert_eq!(parsed, c);
        }
    }
}
