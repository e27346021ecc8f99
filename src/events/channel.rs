// SPDX-License-Identifier: GPL-3.0-only

//! Named event channels
//!
//! A [`BinaryMessenger`] maps channel names to [`StreamHandler`]s. When a
//! remote listener subscribes to a channel the messenger hands the handler a
//! sink; when it unsubscribes the handler is told to cancel.

use super::bridge::EventSink;
use super::types::ChannelError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Error code for malformed channel names
pub const INVALID_CHANNEL: &str = "invalid-channel";
/// Error code for a listen/cancel on a channel nobody handles
pub const NO_HANDLER: &str = "no-handler";

/// Receiver of listen/cancel requests for one channel
pub trait StreamHandler: Send + Sync {
    /// A listener subscribed; `sink` is where its events go
    fn on_listen(
        &self,
        arguments: Option<Value>,
        sink: Box<dyn EventSink>,
    ) -> Result<(), ChannelError>;

    /// The listener unsubscribed
    fn on_cancel(&self, arguments: Option<Value>) -> Result<(), ChannelError>;
}

/// Transport that routes channel subscriptions to handlers
pub trait BinaryMessenger: Send + Sync {
    /// Install `handler` for `channel`, replacing any previous handler
    fn set_stream_handler(
        &self,
        channel: &str,
        handler: Arc<dyn StreamHandler>,
    ) -> Result<(), ChannelError>;

    /// Remove the handler for `channel`, if any
    fn clear_stream_handler(&self, channel: &str);
}

/// In-process messenger
///
/// Listeners in the same process subscribe with [`ChannelRegistry::listen`]
/// and unsubscribe with [`ChannelRegistry::cancel`].
#[derive(Default)]
pub struct ChannelRegistry {
    handlers: Mutex<HashMap<String, Arc<dyn StreamHandler>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a listener to `channel`
    pub fn listen(
        &self,
        channel: &str,
        arguments: Option<Value>,
        sink: Box<dyn EventSink>,
    ) -> Result<(), ChannelError> {
        let handler = self.handler(channel)?;
        debug!(channel, "Listener subscribed");
        handler.on_listen(arguments, sink)
    }

    /// Unsubscribe the listener of `channel`
    pub fn cancel(&self, channel: &str, arguments: Option<Value>) -> Result<(), ChannelError> {
        let handler = self.handler(channel)?;
        debug!(channel, "Listener cancelled");
        handler.on_cancel(arguments)
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.lock().contains_key(channel)
    }

    /// Names of all channels with a handler, sorted
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    // Handlers are called outside the lock so they may touch the registry
    fn handler(&self, channel: &str) -> Result<Arc<dyn StreamHandler>, ChannelError> {
        self.lock().get(channel).cloned().ok_or_else(|| {
            ChannelError::new(
                NO_HANDLER,
                Some(format!("no stream handler registered for '{}'", channel)),
                None,
            )
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<dyn StreamHandler>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BinaryMessenger for ChannelRegistry {
    fn set_stream_handler(
        &self,
        channel: &str,
        handler: Arc<dyn StreamHandler>,
    ) -> Result<(), ChannelError> {
        validate_channel_name(channel)?;

        if self.lock().insert(channel.to_string(), handler).is_some() {
            warn!(channel, "Replaced existing stream handler");
        } else {
            debug!(channel, "Registered stream handler");
        }
        Ok(())
    }

    fn clear_stream_handler(&self, channel: &str) {
        if self.lock().remove(channel).is_some() {
            debug!(channel, "Removed stream handler");
        }
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("channels", &self.channels())
            .finish()
    }
}

/// Reject names a listener could never address
pub fn validate_channel_name(channel: &str) -> Result<(), ChannelError> {
    if channel.trim().is_empty() {
        return Err(ChannelError::new(
            INVALID_CHANNEL,
            Some("channel name must not be empty".to_string()),
            None,
        ));
    }
    if channel.chars().any(char::is_control) {
        return Err(ChannelError::new(
            INVALID_CHANNEL,
            Some(format!("channel name {:?} contains control characters", channel)),
            None,
        ));
    }
    Ok(())
}
