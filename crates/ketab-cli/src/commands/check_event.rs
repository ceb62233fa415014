//! `ketab check-event <file>`

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;

use ketab::core::{SignedEvent, UnsignedEvent};
use ketab::validate_event;

/// Validate the event in `file`. Signed events also have their id and
/// signature checked.
pub fn run(file: &Path) -> anyhow::Result<()> {
    let data =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let value: Value = serde_json::from_str(&data).context("event file is not JSON")?;

    let event = if value.get("sig").is_some() {
        let signed: SignedEvent =
            serde_json::from_value(value).context("malformed signed event")?;
        signed.verify().context("signature check failed")?;
        println!("Signature: ok ({})", signed.id);
        signed.event
    } else {
        serde_json::from_value::<UnsignedEvent>(value).context("malformed event")?
    };

    let result = validate_event(&event);
    println!("{}", result.reason);
    if !result.valid {
        bail!("event is not valid");
    }
    Ok(())
}
