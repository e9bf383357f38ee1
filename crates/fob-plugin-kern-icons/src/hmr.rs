//! Live-update messages pushed to connected dev clients
//!
//! The host's dev server owns the client connections; it hands the plugin an
//! [`HmrClient`] when a watched file changes.

use crate::error::{KernIconsError, Result};
use async_trait::async_trait;
use serde::Serialize;

/// Event name clients listen on for new icon rules
pub const HMR_EVENT: &str = "kern-extra-icons";

/// Payload of the icon event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconUpdatePayload {
    /// Resolved CSS rules for icons the client has not seen yet
    pub icons: Vec<String>,
}

/// Custom live-update message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HmrMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub event: &'static str,
    pub data: IconUpdatePayload,
}

impl HmrMessage {
    /// Message announcing newly discovered icon rules
    pub fn icons(icons: Vec<String>) -> Self {
        Self {
            kind: "custom",
            event: HMR_EVENT,
            data: IconUpdatePayload { icons },
        }
    }
}

/// Channel to a connected live-update client
#[async_trait]
pub trait HmrClient: Send + Sync {
    async fn send(&self, message: &HmrMessage) -> Result<()>;
}

/// Dev servers that fan JSON strings out to SSE/WebSocket clients can hand
/// their per-client sender over directly.
#[async_trait]
impl HmrClient for tokio::sync::mpsc::Sender<String> {
    async fn send(&self, message: &HmrMessage) -> Result<()> {
        let json = serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string());
        tokio::sync::mpsc::Sender::send(self, json)
            .await
            .map_err(|_| KernIconsError::client_disconnected(message.event))
    }
}
