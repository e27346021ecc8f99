// SPDX-License-Identifier: GPL-3.0-only

//! Single-listener event bridge
//!
//! The bridge owns at most one sink. Registering a new sink drops the old
//! one, emitting without a sink does nothing, and delivery failures are
//! logged and forgotten.

use super::channel::{BinaryMessenger, StreamHandler};
use super::types::{ChannelError, SinkDisconnected, StreamEvent};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Destination for stream events
///
/// The bridge holds its sink lock while `deliver` runs. Implementations must
/// return without blocking and must not call back into the bridge that owns
/// them (`emit`, `register`, `unregister`, `is_attached`); doing so deadlocks.
/// Hand the event to a channel and do the real work on the receiving side.
pub trait EventSink: Send {
    /// Queue `event` for the listener; never blocks
    fn deliver(&self, event: StreamEvent) -> Result<(), SinkDisconnected>;
}

impl EventSink for futures::channel::mpsc::UnboundedSender<StreamEvent> {
    fn deliver(&self, event: StreamEvent) -> Result<(), SinkDisconnected> {
        self.unbounded_send(event).map_err(|_| SinkDisconnected)
    }
}

impl EventSink for tokio::sync::mpsc::UnboundedSender<StreamEvent> {
    fn deliver(&self, event: StreamEvent) -> Result<(), SinkDisconnected> {
        self.send(event).map_err(|_| SinkDisconnected)
    }
}

/// Forwards events to whichever listener is currently registered
pub struct EventBridge {
    channel: String,
    /// Held across read-and-forward so a replacement cannot interleave
    sink: Mutex<Option<Box<dyn EventSink>>>,
}

impl EventBridge {
    /// Create a detached bridge for `channel`
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            sink: Mutex::new(None),
        }
    }

    /// Create a bridge and install it as the stream handler for `channel`
    pub fn register_on(
        channel: impl Into<String>,
        messenger: &dyn BinaryMessenger,
    ) -> Result<Arc<Self>, ChannelError> {
        let bridge = Arc::new(Self::new(channel));
        messenger.set_stream_handler(&bridge.channel, bridge.clone())?;
        Ok(bridge)
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Attach a sink, dropping any previous one
    pub fn register(&self, sink: Box<dyn EventSink>) {
        let replaced = self.lock().replace(sink).is_some();
        info!(channel = %self.channel, replaced, "Event sink attached");
    }

    /// Detach the current sink; no-op when already detached
    pub fn unregister(&self) {
        if self.lock().take().is_some() {
            info!(channel = %self.channel, "Event sink detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.lock().is_some()
    }

    /// Forward an application event to the listener, if any
    pub fn emit(&self, payload: impl Into<Value>) {
        self.forward(StreamEvent::Event(payload.into()));
    }

    /// Forward an error event to the listener, if any
    pub fn emit_error(&self, code: &str, message: Option<&str>, details: Option<Value>) {
        self.forward(StreamEvent::Error(ChannelError::new(
            code,
            message.map(str::to_string),
            details,
        )));
    }

    fn forward(&self, event: StreamEvent) {
        let guard = self.lock();
        let Some(sink) = guard.as_ref() else {
            return;
        };

        if let Err(e) = sink.deliver(event) {
            debug!(channel = %self.channel, error = %e, "Dropped event");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn EventSink>>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StreamHandler for EventBridge {
    fn on_listen(
        &self,
        _arguments: Option<Value>,
        sink: Box<dyn EventSink>,
    ) -> Result<(), ChannelError> {
        self.register(sink);
        Ok(())
    }

    fn on_cancel(&self, _arguments: Option<Value>) -> Result<(), ChannelError> {
        self.unregister();
        Ok(())
    }
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("channel", &self.channel)
            .field("attached", &self.is_attached())
            .finish()
    }
}
