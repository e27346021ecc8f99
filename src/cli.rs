// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Listing capture devices
//! - Looking up the first device of a kind
//! - Watching for device changes over an event channel

use capture_bridge::backends::discovery::{
    CaptureDevice, DeviceEnumerator, DiscoveryBackendType, FixedDiscovery, MediaKind,
    PipeWireDiscovery, V4l2Discovery,
};
use capture_bridge::events::StreamEvent;
use capture_bridge::{AppResult, Config, watcher};
use futures::StreamExt;
use std::path::Path;
use tracing::{info, warn};

/// Pick the discovery backend from the snapshot flag or the config
pub fn build_enumerator(config: &Config, snapshot: Option<&Path>) -> AppResult<DeviceEnumerator> {
    if let Some(path) = snapshot {
        return Ok(DeviceEnumerator::new(Box::new(FixedDiscovery::from_json_file(
            path,
        )?)));
    }

    let enumerator = match config.backend {
        DiscoveryBackendType::PipeWire => DeviceEnumerator::new(Box::new(
            PipeWireDiscovery::new().with_timeout(config.discovery_timeout()),
        )),
        DiscoveryBackendType::V4l2 => DeviceEnumerator::new(Box::new(V4l2Discovery::new())),
    };

    if !enumerator.backend().is_available() {
        warn!(backend = %config.backend, "Discovery backend not available on this system");
    }
    Ok(enumerator)
}

/// List devices, cameras first when no kind is given
pub fn list_devices(
    enumerator: &DeviceEnumerator,
    media: Option<MediaKind>,
    as_json: bool,
) -> AppResult<()> {
    let devices = enumerator.find_all_devices_by_media_kind(media);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No capture devices found.");
        return Ok(());
    }

    println!("Available devices:");
    println!();
    for (index, device) in devices.iter().enumerate() {
        println!("  [{}] {}", index, device.name);
        println!("      {}", describe(device));
        println!();
    }

    Ok(())
}

/// Print the first device of a kind
pub fn first_device(enumerator: &DeviceEnumerator, media: MediaKind, as_json: bool) -> AppResult<()> {
    let device = enumerator.find_device_by_media_kind(media);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&device)?);
        return Ok(());
    }

    match device {
        Some(device) => {
            println!("{}", device.name);
            println!("  {}", describe(&device));
        }
        None => println!("No {} device found.", media),
    }
    Ok(())
}

fn describe(device: &CaptureDevice) -> String {
    let mut parts = vec![device.media_kind.to_string(), device.device_type.to_string()];
    if device.is_default {
        parts.push("default".to_string());
    }
    if let Some(model) = &device.model_id {
        parts.push(model.clone());
    }
    parts.push(device.unique_id.clone());
    parts.join(", ")
}

/// Re-query devices on an interval and publish changes on the event channel
///
/// A local listener subscribes to the configured channel and prints every
/// event as a JSON line. Ctrl-C cancels the subscription and returns.
pub fn watch_devices(
    enumerator: DeviceEnumerator,
    media: Option<MediaKind>,
    config: &Config,
) -> AppResult<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let (tx, mut rx) = futures::channel::mpsc::unbounded::<StreamEvent>();
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.next().await {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("Failed to serialize event: {}", e),
                }
            }
        });

        let interrupted = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Interrupted, stopping watcher");
        };
        let result = watcher::watch(enumerator, media, config, Box::new(tx), interrupted).await;

        // The watcher dropped the sink on exit, which ends the printer's stream
        if let Err(e) = printer.await {
            warn!("Event printer task failed: {}", e);
        }
        result
    })
}
