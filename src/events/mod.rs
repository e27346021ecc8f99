// SPDX-License-Identifier: GPL-3.0-only

//! Event streaming to a remote listener
//!
//! - [`bridge`]: [`EventBridge`], a single-sink forwarder
//! - [`channel`]: named channels, the [`StreamHandler`] entry points and the
//!   in-process [`ChannelRegistry`]
//! - [`types`]: event and error payloads

pub mod bridge;
pub mod channel;
pub mod types;

pub use bridge::{EventBridge, EventSink};
pub use channel::{BinaryMessenger, ChannelRegistry, StreamHandler};
pub use types::{ChannelError, SinkDisconnected, StreamEvent};
