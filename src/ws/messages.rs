//! Realtime frame codec.
//!
//! Every frame in either direction is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{OrderEvent, OrderId};

/// Top-level realtime frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsFrame {
    /// Event name, e.g. `os:created` or `os:subscribe`.
    pub event: String,
    /// Event-specific payload. `null` when absent.
    #[serde(default)]
    pub data: Value,
}

impl WsFrame {
    /// Builds a frame from a name and payload.
    #[must_use]
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Greeting sent once right after the upgrade.
    #[must_use]
    pub fn server_info(connection_id: &str, port: u16) -> Self {
        Self::new(
            "server:info",
            json!({
                "message": "connected to service order tracker",
                "version": env!("CARGO_PKG_VERSION"),
                "connectionId": connection_id,
                "port": port,
            }),
        )
    }

    /// Acknowledges a subscription change.
    #[must_use]
    pub fn subscription_ack(command: &ClientCommand) -> Option<Self> {
        match command {
            ClientCommand::Subscribe(id) => {
                Some(Self::new("os:subscribed", json!({ "osId": id })))
            }
            ClientCommand::Unsubscribe(id) => {
                Some(Self::new("os:unsubscribed", json!({ "osId": id })))
            }
            ClientCommand::Ping => None,
        }
    }

    /// Reply to `ping`.
    #[must_use]
    pub fn pong() -> Self {
        Self::new("pong", Value::Null)
    }

    /// Error reply for a frame the server could not act on.
    #[must_use]
    pub fn error(err: &FrameError) -> Self {
        Self::new("error", json!({ "message": err.to_string() }))
    }

    /// Serializes the frame to JSON text.
    #[must_use]
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<&OrderEvent> for WsFrame {
    fn from(event: &OrderEvent) -> Self {
        Self::new(event.name(), event.payload())
    }
}

/// Commands a client can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Join the topic of one order.
    Subscribe(OrderId),
    /// Leave the topic of one order.
    Unsubscribe(OrderId),
    /// Liveness check.
    Ping,
}

/// Reasons an incoming frame is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Not a `{"event", "data"}` JSON object.
    #[error("malformed frame: {0}")]
    Malformed(String),
    /// The event name is not a client command.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    /// The payload does not name an order.
    #[error("{0} needs an order id")]
    MissingOrderId(String),
}

impl ClientCommand {
    /// Decodes a client text frame.
    ///
    /// The order id for `os:subscribe`/`os:unsubscribe` may be given as a
    /// number, a numeric string, or an object with an `osId` field.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameError`] describing why the frame was rejected.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let frame: WsFrame =
            serde_json::from_str(text).map_err(|e| FrameError::Malformed(e.to_string()))?;
        match frame.event.as_str() {
            "ping" => Ok(Self::Ping),
            "os:subscribe" => order_id(&frame.data)
                .map(Self::Subscribe)
                .ok_or(FrameError::MissingOrderId(frame.event)),
            "os:unsubscribe" => order_id(&frame.data)
                .map(Self::Unsubscribe)
                .ok_or(FrameError::MissingOrderId(frame.event)),
            _ => Err(FrameError::UnknownEvent(frame.event)),
        }
    }
}

fn order_id(data: &Value) -> Option<OrderId> {
    match data {
        Value::Number(n) => n.as_u64().map(OrderId::new),
        Value::String(s) => s.trim().parse().ok().map(OrderId::new),
        Value::Object(map) => map.get("osId").and_then(order_id),
        _ => None,
    }
}
