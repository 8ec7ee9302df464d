//! # Chat-platform collaborator boundary.
//!
//! Two independent entry points: an outbound post keyed by channel name, and
//! an inbound stream of JSON-shaped events. The message worker owns the
//! connection, decodes each raw value into a [`ChatEvent`], stamps the
//! receipt time, and dispatches to message-capable tasks. Events without a
//! `type` field are ignored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::collab::CollabError;

/// A decoded inbound chat event.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    /// The event's `type` field.
    pub kind: String,
    /// The event's `channel` field, when present.
    pub channel: Option<String>,
    /// The event's `text` field, when present.
    pub text: Option<String>,
    /// The full raw event for task-specific fields.
    pub raw: Value,
    /// When the message worker received the event.
    pub received_at: DateTime<Utc>,
}

impl ChatEvent {
    /// Decodes a raw event. Returns `None` when the `type` field is missing
    /// or not a string.
    pub fn from_value(raw: Value, received_at: DateTime<Utc>) -> Option<Self> {
        let kind = raw.get("type")?.as_str()?.to_string();
        let channel = raw
            .get("channel")
            .and_then(Value::as_str)
            .map(str::to_string);
        let text = raw.get("text").and_then(Value::as_str).map(str::to_string);
        Some(Self {
            kind,
            channel,
            text,
            raw,
            received_at,
        })
    }

    /// True when the event is of the given kind.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

/// Outbound side plus connection factory for the inbound stream.
#[async_trait]
pub trait ChatClient: Send + Sync + 'static {
    /// Posts a message to the named channel.
    async fn post(&self, channel: &str, text: &str) -> Result<(), CollabError>;

    /// Opens a fresh inbound event stream. The message worker calls this
    /// whenever the current connection is absent or dead.
    async fn connect(&self) -> Result<Box<dyn ChatConnection>, CollabError>;
}

/// One live inbound event stream.
#[async_trait]
pub trait ChatConnection: Send {
    /// Next raw event; `Ok(None)` means the stream ended in an orderly way.
    async fn next_event(&mut self) -> Result<Option<Value>, CollabError>;
}
