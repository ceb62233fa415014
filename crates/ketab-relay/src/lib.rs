//! # Ketab Relay
//!
//! Delivery of signed events to relay endpoints.
//!
//! ## Overview
//!
//! - [`Transport`] - The delivery capability, one event to one endpoint
//! - [`memory::MemoryTransport`] - In-memory transport for tests and dry runs
//! - [`WebSocketTransport`] - `["EVENT", ...]` / `["OK", ...]` over WebSockets
//! - [`deliver`] - Sequential best-effort delivery to every configured endpoint
//!
//! There is no retry or backoff here. An endpoint failure is logged and the
//! next endpoint is attempted.

pub mod config;
pub mod delivery;
pub mod error;
pub mod transport;
pub mod websocket;

pub use config::RelayConfig;
pub use delivery::{deliver, DeliveryReport, EndpointOutcome};
pub use error::{RelayError, Result};
pub use transport::{memory, Transport};
pub use websocket::{WebSocketConfig, WebSocketTransport};
