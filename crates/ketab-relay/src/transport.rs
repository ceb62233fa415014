//! Transport abstraction for event delivery.
//!
//! A transport delivers one signed event to one endpoint. Implementations may
//! use WebSockets, HTTP, or anything else.

use async_trait::async_trait;

use ketab_core::SignedEvent;

use crate::error::Result;

/// Transport trait for delivering events.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `event` to `endpoint`. Returns once the endpoint accepted it.
    async fn publish(&self, endpoint: &str, event: &SignedEvent) -> Result<()>;
}

/// A simple in-memory transport for testing.
///
/// Records every attempt and fails on a configurable set of endpoints.
pub mod memory {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::error::RelayError;

    /// One recorded delivery attempt.
    #[derive(Debug, Clone)]
    pub struct Attempt {
        pub endpoint: String,
        pub event: SignedEvent,
        pub accepted: bool,
    }

    #[derive(Debug, Default)]
    pub struct MemoryTransport {
        failing: HashSet<String>,
        attempts: Mutex<Vec<Attempt>>,
    }

    impl MemoryTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every delivery to `endpoint` fail.
        pub fn failing_on(mut self, endpoint: impl Into<String>) -> Self {
            self.failing.insert(endpoint.into());
            self
        }

        /// Every attempt so far, in order.
        pub fn attempts(&self) -> Vec<Attempt> {
            self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
        }

        /// Events accepted by `endpoint`, in order.
        pub fn accepted_by(&self, endpoint: &str) -> Vec<SignedEvent> {
            self.attempts()
                .into_iter()
                .filter(|a| a.accepted && a.endpoint == endpoint)
                .map(|a| a.event)
                .collect()
        }
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn publish(&self, endpoint: &str, event: &SignedEvent) -> Result<()> {
            let accepted = !self.failing.contains(endpoint);
            if let Ok(mut attempts) = self.attempts.lock() {
                attempts.push(Attempt {
                    endpoint: endpoint.to_string(),
                    event: event.clone(),
                    accepted,
                });
            }
            if accepted {
                Ok(())
            } else {
                Err(RelayError::ConnectionFailed(format!("{endpoint} unreachable")))
            }
        }
    }
}
