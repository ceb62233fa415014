//! Best-effort delivery of one event to every endpoint.

use ketab_core::SignedEvent;

use crate::error::RelayError;
use crate::transport::Transport;

/// What happened at one endpoint.
#[derive(Debug)]
pub struct EndpointOutcome {
    pub endpoint: String,
    pub result: Result<(), RelayError>,
}

/// Per-endpoint results for one event.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub outcomes: Vec<EndpointOutcome>,
}

impl DeliveryReport {
    /// Number of endpoints that accepted the event.
    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.accepted()
    }

    /// True when at least one endpoint accepted the event.
    pub fn any_accepted(&self) -> bool {
        self.accepted() > 0
    }
}

/// Deliver `event` to each endpoint in order.
///
/// A failing endpoint is logged and does not stop the remaining ones.
pub async fn deliver<T: Transport + ?Sized>(
    transport: &T,
    endpoints: &[String],
    event: &SignedEvent,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    let hex = event.id.to_hex();
    let id = &hex[..12];

    for endpoint in endpoints {
        let result = transport.publish(endpoint, event).await;
        match &result {
            Ok(()) => tracing::info!(endpoint = %endpoint, id, "delivered"),
            Err(e) => tracing::warn!(endpoint = %endpoint, id, "delivery failed: {}", e),
        }
        report.outcomes.push(EndpointOutcome {
            endpoint: endpoint.clone(),
            result,
        });
    }

    report
}
