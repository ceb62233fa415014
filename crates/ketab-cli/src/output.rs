//! Human-readable report printing.

use ketab::{OutcomeStatus, PublishReport};

pub fn print_report(report: &PublishReport) {
    for outcome in &report.outcomes {
        let id = outcome
            .event
            .as_ref()
            .map(|e| e.id.to_hex()[..12].to_string())
            .unwrap_or_else(|| "-".repeat(12));
        let status = match &outcome.status {
            OutcomeStatus::SignFailed(reason) => format!("sign failed: {reason}"),
            OutcomeStatus::DryRun => "signed (dry run)".to_string(),
            OutcomeStatus::Delivered { accepted, failed } => {
                format!("delivered to {accepted}/{}", accepted + failed)
            }
            OutcomeStatus::Undelivered => "not accepted by any relay".to_string(),
        };
        println!("  [{:>5}] {id} {:<40} {status}", outcome.kind, outcome.label);
    }
    println!("{}/{} events published", report.succeeded, report.attempted);
}
