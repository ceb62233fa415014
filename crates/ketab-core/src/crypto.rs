//! Cryptographic primitives for Ketab.
//!
//! Two signing schemes share the same 32-byte key and 64-byte signature
//! shapes: BIP-340 Schnorr over secp256k1 ([`SchnorrKeypair`]), which public
//! relays verify, and Ed25519 ([`Keypair`]) for local identities. Keys and
//! signatures travel as lowercase hex on the wire.

use ed25519_dalek::{Signer as _, SigningKey, Verifier, VerifyingKey};
use k256::schnorr;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, SignError};
use crate::event::{SignedEvent, UnsignedEvent};

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let bytes = hex::decode(s)?;
    if bytes.len() != N {
        return Err(hex::FromHexError::InvalidStringLength);
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// A 32-byte author identity (Ed25519 public key).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        decode_fixed::<32>(s).map(Self)
    }

    /// Verify a signature over a message under either supported scheme.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CoreError> {
        self.verify_schnorr(message, signature)
            .or_else(|_| self.verify_ed25519(message, signature))
    }

    /// Verify a BIP-340 Schnorr signature, treating the key as an x-only
    /// secp256k1 point.
    pub fn verify_schnorr(&self, message: &[u8], signature: &Signature) -> Result<(), CoreError> {
        let verifying_key =
            schnorr::VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let sig = schnorr::Signature::try_from(&signature.0[..])
            .map_err(|_| CoreError::InvalidSignature)?;
        verifying_key
            .verify_raw(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }

    /// Verify an Ed25519 signature.
    pub fn verify_ed25519(&self, message: &[u8], signature: &Signature) -> Result<(), CoreError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 128-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        decode_fixed::<64>(s).map(Self)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The signing capability used by the encoder and publisher.
///
/// Implementations may hold a key locally or forward to a remote signer. The
/// signer must refuse events whose pubkey is not its own identity.
pub trait Signer: Send + Sync {
    /// The identity this signer signs as.
    fn public_key(&self) -> PublicKey;

    /// Compute the id of `event` and sign it.
    fn sign_event(&self, event: UnsignedEvent) -> Result<SignedEvent, SignError>;
}

/// A local Ed25519 keypair.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Create from a 64-character hex secret.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let seed = decode_fixed::<32>(s.trim())
            .map_err(|e| CoreError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", Signer::public_key(self))
    }
}

impl Signer for Keypair {
    fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    fn sign_event(&self, event: UnsignedEvent) -> Result<SignedEvent, SignError> {
        seal(Signer::public_key(self), event, |id| Ok(self.sign(id)))
    }
}

/// Check the identity, compute the id and sign it with `sign`.
fn seal(
    me: PublicKey,
    event: UnsignedEvent,
    sign: impl FnOnce(&[u8]) -> Result<Signature, SignError>,
) -> Result<SignedEvent, SignError> {
    if event.pubkey != me {
        return Err(SignError::IdentityMismatch {
            event: event.pubkey.to_hex(),
            signer: me.to_hex(),
        });
    }
    let id = event
        .compute_id()
        .map_err(|e| SignError::Serialization(e.to_string()))?;
    let sig = sign(&id.as_bytes()[..])?;
    Ok(SignedEvent { id, event, sig })
}

// ─────────────────────────────────────────────────────────────────────────────
// secp256k1
// ─────────────────────────────────────────────────────────────────────────────

/// A secp256k1 keypair signing with BIP-340 Schnorr, as Nostr relays expect.
///
/// The public key is the 32-byte x-only point, so an existing Nostr secret
/// key yields the identity its owner already publishes under.
#[derive(Clone)]
pub struct SchnorrKeypair {
    signing_key: schnorr::SigningKey,
}

impl SchnorrKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: schnorr::SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Create from a 32-byte secret scalar. Zero and values not below the
    /// curve order are rejected.
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, CoreError> {
        schnorr::SigningKey::from_bytes(secret)
            .map(|signing_key| Self { signing_key })
            .map_err(|e| CoreError::InvalidSecretKey(e.to_string()))
    }

    /// Create from a 64-character hex secret.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let secret = decode_fixed::<32>(s.trim())
            .map_err(|e| CoreError::InvalidSecretKey(e.to_string()))?;
        Self::from_bytes(&secret)
    }

    /// Sign a message with fresh auxiliary randomness.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, CoreError> {
        let mut aux = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut aux);
        let sig = self
            .signing_key
            .sign_raw(message, &aux)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(Signature(sig.to_bytes()))
    }
}

impl fmt::Debug for SchnorrKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchnorrKeypair({:?})", Signer::public_key(self))
    }
}

impl Signer for SchnorrKeypair {
    fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes().into())
    }

    fn sign_event(&self, event: UnsignedEvent) -> Result<SignedEvent, SignError> {
        seal(Signer::public_key(self), event, |id| {
            self.sign(id)
                .map_err(|e| SignError::Unavailable(e.to_string()))
        })
    }
}
