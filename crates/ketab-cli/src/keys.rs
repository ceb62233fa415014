//! Signing identity resolution.

use anyhow::{bail, Context};

use ketab::SchnorrKeypair;

/// Build the secp256k1 signing key from `--secret-key` or `KETAB_SECRET_KEY`.
///
/// This is the same 32-byte hex secret a Nostr client holds, so events are
/// signed under the identity relays and readers already know.
pub fn resolve(secret: Option<&str>) -> anyhow::Result<SchnorrKeypair> {
    let Some(secret) = secret.map(str::trim).filter(|s| !s.is_empty()) else {
        bail!("no secret key: pass --secret-key or set KETAB_SECRET_KEY");
    };
    SchnorrKeypair::from_hex(secret).context("invalid secret key")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketab::core::{EventKind, Tag, UnsignedEvent};
    use ketab::Signer;

    #[test]
    fn test_missing_secret() {
        assert!(resolve(None).is_err());
        assert!(resolve(Some("  ")).is_err());
    }

    #[test]
    fn test_hex_secret() {
        let keypair = resolve(Some(&"07".repeat(32))).unwrap();
        let expected = SchnorrKeypair::from_bytes(&[7u8; 32]).unwrap();
        assert_eq!(keypair.public_key(), expected.public_key());
    }

    #[test]
    fn test_nostr_secret_key_identity() {
        // BIP-340 test vector 0.
        let secret = format!("{}03", "00".repeat(31));
        let keypair = resolve(Some(&secret)).unwrap();
        assert_eq!(
            keypair.public_key().to_hex(),
            "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
    }

    #[test]
    fn test_signs_relay_verifiable_events() {
        let keypair = resolve(Some(&"07".repeat(32))).unwrap();
        let event = UnsignedEvent::new(
            keypair.public_key(),
            1_700_000_000,
            EventKind::Unit,
            vec![Tag::new("d", "unit-1")],
            "{}",
        );
        let signed = keypair.sign_event(event).unwrap();
        assert!(signed.verify().is_ok());
        assert!(signed
            .pubkey()
            .verify_schnorr(signed.id.as_bytes(), &signed.sig)
            .is_ok());
    }

    #[test]
    fn test_malformed_secret() {
        assert!(resolve(Some("not-hex")).is_err());
        assert!(resolve(Some(&"07".repeat(31))).is_err());
        assert!(resolve(Some(&"00".repeat(32))).is_err());
    }
}
