// SPDX-License-Identifier: GPL-3.0-only

//! Payload types carried over event channels

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured error delivered to a listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {}", .message.as_deref().unwrap_or("(no message)"))]
pub struct ChannelError {
    pub code: String,
    pub message: Option<String>,
    pub details: Option<Value>,
}

impl ChannelError {
    pub fn new(code: impl Into<String>, message: Option<String>, details: Option<Value>) -> Self {
        Self {
            code: code.into(),
            message,
            details,
        }
    }
}

/// One item on an event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Application payload, forwarded verbatim
    Event(Value),
    /// Application-level error
    Error(ChannelError),
}

impl StreamEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, StreamEvent::Error(_))
    }
}

/// The sink's transport is gone (listener dropped its receiving end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event sink disconnected")]
pub struct SinkDisconnected;
