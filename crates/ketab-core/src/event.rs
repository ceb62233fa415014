//! Wire-format events.
//!
//! An unsigned event is what the encoder produces. A signed event adds the
//! content-derived id and a signature by the event's pubkey.

use serde::{Deserialize, Serialize};

use crate::crypto::{PublicKey, Signature};
use crate::error::CoreError;
use crate::kind::EventKind;
use crate::types::EventId;
use crate::validation::{validate_event, Validation};

/// A single tag: a name followed by one or more values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// A two-element tag `[name, value]`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![name.into(), value.into()])
    }

    /// Append a relay hint (or any trailing value).
    pub fn with(mut self, extra: impl Into<String>) -> Self {
        self.0.push(extra.into());
        self
    }

    /// The tag name, i.e. the first element.
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The first value, i.e. the second element.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

/// An event before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    pub pubkey: PublicKey,
    pub created_at: i64,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    pub fn new(
        pubkey: PublicKey,
        created_at: i64,
        kind: EventKind,
        tags: Vec<Tag>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            pubkey,
            created_at,
            kind: kind.to_u32(),
            tags,
            content: content.into(),
        }
    }

    /// Serialize the commitment array `[0, pubkey, created_at, kind, tags, content]`.
    pub fn commitment_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let commitment = (
            0u8,
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        );
        Ok(serde_json::to_vec(&commitment)?)
    }

    /// The id this event will have once signed.
    pub fn compute_id(&self) -> Result<EventId, CoreError> {
        Ok(EventId::digest(&self.commitment_bytes()?))
    }

    /// The first value of the first tag named `name`.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name() == Some(name))
            .and_then(Tag::value)
    }

    /// The first value of every tag named `name`.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.name() == Some(name))
            .filter_map(Tag::value)
    }

    /// The declared kind, if it is a protocol kind.
    pub fn event_kind(&self) -> Option<EventKind> {
        EventKind::from_u32(self.kind)
    }

    /// Run the schema validator on this event.
    pub fn validate(&self) -> Validation {
        validate_event(self)
    }
}

/// A signed event as it travels to and from delivery endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEvent {
    pub id: EventId,
    #[serde(flatten)]
    pub event: UnsignedEvent,
    pub sig: Signature,
}

impl SignedEvent {
    /// Check that the id matches the content and the signature matches the id.
    pub fn verify(&self) -> Result<(), CoreError> {
        let expected = self.event.compute_id()?;
        if expected != self.id {
            return Err(CoreError::EventIdMismatch {
                expected: expected.to_hex(),
                actual: self.id.to_hex(),
            });
        }
        self.event.pubkey.verify(self.id.as_bytes(), &self.sig)
    }

    /// Run the schema validator on the event payload.
    pub fn validate(&self) -> Validation {
        validate_event(&self.event)
    }

    pub fn kind(&self) -> u32 {
        self.event.kind
    }

    pub fn pubkey(&self) -> &PublicKey {
        &self.event.pubkey
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Keypair, Signer};

    fn sample(pubkey: PublicKey) -> UnsignedEvent {
        UnsignedEvent::new(
            pubkey,
            1_700_000_000,
            EventKind::Unit,
            vec![Tag::new("d", "unit-1")],
            r#"{"title":"One","index":0,"ord":1,"body":"text"}"#,
        )
    }

    #[test]
    fn test_commitment_shape() {
        let ev = sample(PublicKey::from_bytes([0x01; 32]));
        let bytes = ev.commitment_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 6);
        assert_eq!(arr[0], 0);
        assert_eq!(arr[1], "01".repeat(32));
        assert_eq!(arr[3], 38893);
        assert_eq!(arr[4], serde_json::json!([["d", "unit-1"]]));
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = Keypair::from_seed(&[9u8; 32]);
        let signed = kp.sign_event(sample(kp.public_key())).unwrap();
        assert!(signed.verify().is_ok());

        let mut tampered = signed.clone();
        tampered.event.content.push('!');
        assert!(tampered.verify().is_err());
    }

    #[test]
    fn test_sign_rejects_foreign_pubkey() {
        let kp = Keypair::from_seed(&[9u8; 32]);
        let other = PublicKey::from_bytes([0x02; 32]);
        assert!(kp.sign_event(sample(other)).is_err());
    }

    #[test]
    fn test_signed_event_json_shape() {
        let kp = Keypair::from_seed(&[5u8; 32]);
        let signed = kp.sign_event(sample(kp.public_key())).unwrap();
        let value = serde_json::to_value(&signed).unwrap();
        for field in ["id", "pubkey", "created_at", "kind", "tags", "content", "sig"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        let back: SignedEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, signed);
    }

    #[test]
    fn test_tag_lookup() {
        let ev = UnsignedEvent::new(
            PublicKey::from_bytes([0x01; 32]),
            0,
            EventKind::Book,
            vec![
                Tag::new("a", "30023:x:1"),
                Tag::new("a", "30023:x:2").with("wss://relay"),
                Tag::new("d", "book"),
            ],
            "{}",
        );
        assert_eq!(ev.tag_value("d"), Some("book"));
        assert_eq!(ev.tag_values("a").count(), 2);
        assert_eq!(ev.tag_value("p"), None);
    }
}
