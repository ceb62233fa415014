//! Subcommand implementations.

use anyhow::Context;
use clap::Args;

use ketab::core::PublicKey;
use ketab::relay::RelayConfig;
use ketab::BlockAnchor;

pub mod add_to_library;
pub mod check_event;
pub mod delete_threads;
pub mod publish;
pub mod status;
pub mod validate;

/// Relays used when `--relays` is not given. They verify BIP-340 Schnorr
/// signatures, which is what the CLI signs with.
pub const DEFAULT_RELAYS: &str =
    "wss://relay.nextblock.city,wss://relay.primal.net,wss://nos.lol,wss://relay.damus.io";

#[derive(Args, Debug, Clone)]
pub struct RelayArgs {
    /// Comma-separated relay URLs
    #[arg(long, default_value = DEFAULT_RELAYS)]
    pub relays: String,

    /// Relay hint for references (default: the first relay)
    #[arg(long)]
    pub relay_hint: Option<String>,
}

impl RelayArgs {
    pub fn config(&self) -> RelayConfig {
        let config = RelayConfig::from_csv(&self.relays);
        match &self.relay_hint {
            Some(hint) => config.with_relay_hint(hint.clone()),
            None => config,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnchorArgs {
    /// Public key of the clock that published the anchor block
    #[arg(long, requires = "block_id")]
    pub clock_pubkey: Option<String>,

    /// Identifier of the anchor block
    #[arg(long, requires = "clock_pubkey")]
    pub block_id: Option<String>,
}

impl AnchorArgs {
    pub fn anchor(&self) -> anyhow::Result<Option<BlockAnchor>> {
        match (&self.clock_pubkey, &self.block_id) {
            (Some(pubkey), Some(block_id)) => {
                let clock_pubkey = PublicKey::from_hex(pubkey)
                    .with_context(|| format!("invalid clock pubkey: {pubkey}"))?;
                Ok(Some(BlockAnchor {
                    clock_pubkey,
                    block_id: block_id.clone(),
                }))
            }
            _ => Ok(None),
        }
    }
}

/// Trim and drop blanks from a comma-separated chapter list.
pub fn chapter_list(chapters: &Option<Vec<String>>) -> Vec<String> {
    chapters
        .iter()
        .flatten()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
