// SPDX-License-Identifier: GPL-3.0-only

//! Device watcher
//!
//! Re-queries the enumerator on an interval and publishes the device list on
//! an event channel whenever it changes. An empty list is reported as a
//! `no-devices` error event instead.

use crate::backends::discovery::{CaptureDevice, DeviceEnumerator, MediaKind};
use crate::config::Config;
use crate::constants::events::{DEVICES_CHANGED, NO_DEVICES};
use crate::errors::{AppError, AppResult};
use crate::events::{ChannelRegistry, EventBridge, EventSink};
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Change detection for one watched media kind
#[derive(Debug, Clone)]
pub struct DeviceWatcher {
    media: Option<MediaKind>,
    /// Last published list; `None` until the first publish
    last: Option<Vec<CaptureDevice>>,
}

impl DeviceWatcher {
    /// `None` watches cameras and microphones together
    pub fn new(media: Option<MediaKind>) -> Self {
        Self { media, last: None }
    }

    /// Publish `devices` on `bridge` if they differ from the last list
    ///
    /// Returns whether an event was emitted.
    pub fn update(
        &mut self,
        bridge: &EventBridge,
        devices: Vec<CaptureDevice>,
    ) -> AppResult<bool> {
        if self.last.as_ref() == Some(&devices) {
            return Ok(false);
        }

        if devices.is_empty() {
            bridge.emit_error(
                NO_DEVICES,
                Some("no capture devices found"),
                Some(json!({ "media_kind": self.media })),
            );
        } else {
            bridge.emit(devices_changed_event(self.media, &devices)?);
        }

        debug!(channel = bridge.channel(), count = devices.len(), "Published device list");
        self.last = Some(devices);
        Ok(true)
    }
}

/// Payload of a `devices-changed` event
pub fn devices_changed_event(
    media: Option<MediaKind>,
    devices: &[CaptureDevice],
) -> AppResult<Value> {
    Ok(json!({
        "event": DEVICES_CHANGED,
        "timestamp": chrono::Local::now().to_rfc3339(),
        "media_kind": media,
        "devices": serde_json::to_value(devices)?,
    }))
}

/// Watch devices until `shutdown` resolves
///
/// A bridge is bound to `config.channel_name` in a private registry and
/// `sink` subscribes to it. On shutdown the subscription is cancelled, which
/// drops `sink` and so closes the listener's stream.
pub async fn watch(
    enumerator: DeviceEnumerator,
    media: Option<MediaKind>,
    config: &Config,
    sink: Box<dyn EventSink>,
    shutdown: impl Future<Output = ()>,
) -> AppResult<()> {
    let channel = config.channel_name.as_str();
    let registry = ChannelRegistry::new();
    let bridge = EventBridge::register_on(channel, &registry)?;
    registry.listen(channel, None, sink)?;

    info!(
        channel,
        interval_ms = config.watch_interval().as_millis() as u64,
        media = ?media,
        "Watching capture devices"
    );

    let enumerator = Arc::new(enumerator);
    let mut watcher = DeviceWatcher::new(media);
    let mut ticker = tokio::time::interval(config.watch_interval());
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let enumerator = Arc::clone(&enumerator);
                let devices = tokio::task::spawn_blocking(move || {
                    enumerator.find_all_devices_by_media_kind(media)
                })
                .await
                .map_err(|e| AppError::Other(format!("Discovery task failed: {}", e)))?;

                watcher.update(&bridge, devices)?;
            }
            _ = &mut shutdown => {
                info!("Stopping watcher");
                break;
            }
        }
    }

    registry.cancel(channel, None)?;
    Ok(())
}
