//! WebSocket relay transport.
//!
//! Opens a connection per delivery, sends `["EVENT", <event>]` and waits for
//! the matching `["OK", <id>, <accepted>, <message>]` reply.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use url::Url;

use ketab_core::SignedEvent;

use crate::error::{RelayError, Result};
use crate::transport::Transport;

/// Timeouts for a single delivery.
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    pub connect_timeout: Duration,
    /// How long to wait for the relay's `OK` reply.
    pub ack_timeout: Duration,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            ack_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WebSocketTransport {
    config: WebSocketConfig,
}

impl WebSocketTransport {
    pub fn new(config: WebSocketConfig) -> Self {
        Self { config }
    }
}

/// Outcome of one relay reply frame.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Ok { accepted: bool, message: String },
    Notice(String),
    Other,
}

/// Parse a relay text frame, keeping only what concerns `event_id`.
fn parse_reply(text: &str, event_id: &str) -> Result<Reply> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| RelayError::Protocol(format!("invalid relay frame: {e}")))?;
    let frame = value
        .as_array()
        .ok_or_else(|| RelayError::Protocol("relay frame is not an array".into()))?;

    match frame.first().and_then(Value::as_str) {
        Some("OK") if frame.get(1).and_then(Value::as_str) == Some(event_id) => {
            let accepted = frame.get(2).and_then(Value::as_bool).unwrap_or(false);
            let message = frame
                .get(3)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Ok(Reply::Ok { accepted, message })
        }
        Some("NOTICE") => Ok(Reply::Notice(
            frame
                .get(1)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        )),
        _ => Ok(Reply::Other),
    }
}

type RelayStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Read frames until the relay answers for `event_id`.
async fn await_ok(ws_stream: &mut RelayStream, event_id: &str, endpoint: &str) -> Result<()> {
    while let Some(message) = ws_stream.next().await {
        let message = message.map_err(|e| RelayError::ConnectionFailed(e.to_string()))?;
        match message {
            Message::Text(text) => match parse_reply(&text, event_id) {
                Ok(Reply::Ok { accepted: true, .. }) => return Ok(()),
                Ok(Reply::Ok { message, .. }) => return Err(RelayError::Rejected(message)),
                Ok(Reply::Notice(notice)) => {
                    tracing::debug!(endpoint, notice = %notice, "relay notice");
                }
                Ok(Reply::Other) => {}
                // A frame we cannot read does not end the wait for OK.
                Err(e) => tracing::debug!(endpoint, "skipping relay frame: {}", e),
            },
            Message::Ping(data) => {
                if let Err(e) = ws_stream.send(Message::Pong(data)).await {
                    tracing::debug!(endpoint, "pong failed: {}", e);
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(RelayError::ConnectionFailed("connection closed before OK".into()))
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn publish(&self, endpoint: &str, event: &SignedEvent) -> Result<()> {
        let url: Url = endpoint
            .parse()
            .map_err(|e: url::ParseError| RelayError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(RelayError::InvalidEndpoint(endpoint.to_string()));
        }

        let (mut ws_stream, _response) =
            timeout(self.config.connect_timeout, connect_async(url.as_str()))
                .await
                .map_err(|_| RelayError::Timeout(format!("connect to {endpoint}")))?
                .map_err(|e| RelayError::ConnectionFailed(format!("{endpoint}: {e}")))?;

        let frame = json!(["EVENT", event]).to_string();
        ws_stream
            .send(Message::Text(frame))
            .await
            .map_err(|e| RelayError::ConnectionFailed(e.to_string()))?;

        let event_id = event.id.to_hex();
        let outcome = timeout(
            self.config.ack_timeout,
            await_ok(&mut ws_stream, &event_id, endpoint),
        )
        .await
        .map_err(|_| RelayError::Timeout(format!("no OK from {endpoint}")))?;

        if let Err(e) = ws_stream.close(None).await {
            tracing::debug!(endpoint, "close failed: {}", e);
        }
        outcome
    }
}
