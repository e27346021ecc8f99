// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera discovery
//!
//! Walks `/dev/video*` directly. Useful on systems without a PipeWire
//! session; it only ever reports video devices.

use super::types::{CaptureDevice, DevicePosition, DeviceType, DiscoveryFilter, MediaKind};
use super::DeviceDiscovery;
use tracing::debug;
use v4l::capability::Flags;
use v4l::video::Capture;

/// Driver name reported by the v4l2loopback module
const LOOPBACK_DRIVER: &str = "v4l2 loopback";

/// V4L2 discovery backend
#[derive(Debug, Clone, Default)]
pub struct V4l2Discovery;

impl V4l2Discovery {
    pub fn new() -> Self {
        Self
    }

    /// Snapshot every capture-capable video node, ordered by node index
    pub fn snapshot(&self) -> Vec<CaptureDevice> {
        let mut nodes = v4l::context::enum_devices();
        nodes.sort_by_key(|node| node.index());

        nodes
            .iter()
            .filter_map(|node| {
                let path = node.path().to_string_lossy().to_string();
                probe_node(&path, node.name())
            })
            .collect()
    }
}

impl DeviceDiscovery for V4l2Discovery {
    fn discover(&self, filter: &DiscoveryFilter) -> Vec<CaptureDevice> {
        // Nothing here can carry audio
        if filter.media_kind == Some(MediaKind::Audio) {
            return Vec::new();
        }
        filter.apply(self.snapshot())
    }

    fn is_available(&self) -> bool {
        !v4l::context::enum_devices().is_empty()
    }

    fn name(&self) -> &'static str {
        "v4l2"
    }
}

/// Open a node and turn it into a device if it can capture video
fn probe_node(path: &str, sysfs_name: Option<String>) -> Option<CaptureDevice> {
    let device = match v4l::Device::with_path(path) {
        Ok(device) => device,
        Err(e) => {
            debug!(path, error = %e, "Failed to open V4L2 node");
            return None;
        }
    };

    let caps = match device.query_caps() {
        Ok(caps) => caps,
        Err(e) => {
            debug!(path, error = %e, "Failed to query V4L2 capabilities");
            return None;
        }
    };

    if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
        debug!(path, card = %caps.card, "Skipping node without video capture");
        return None;
    }

    // UVC exposes a metadata node next to each capture node; it has no formats
    let has_formats = device
        .enum_formats()
        .map(|formats| !formats.is_empty())
        .unwrap_or(false);
    if !has_formats {
        debug!(path, card = %caps.card, "Skipping node without capture formats");
        return None;
    }

    let device_type = classify_v4l2(&caps.driver, &caps.bus);
    let name = if caps.card.is_empty() {
        sysfs_name.unwrap_or_else(|| path.to_string())
    } else {
        caps.card.clone()
    };

    debug!(
        path,
        name = %name,
        driver = %caps.driver,
        bus = %caps.bus,
        device_type = %device_type,
        "Found V4L2 camera"
    );

    Some(CaptureDevice {
        unique_id: path.to_string(),
        name,
        device_type,
        media_kind: MediaKind::Video,
        position: DevicePosition::Unspecified,
        is_default: false,
        model_id: Some(caps.driver),
        path: Some(path.to_string()),
    })
}

/// Classify a V4L2 node from its driver and bus info
pub fn classify_v4l2(driver: &str, bus_info: &str) -> DeviceType {
    if driver == LOOPBACK_DRIVER {
        DeviceType::Virtual
    } else if bus_info.starts_with("usb") {
        DeviceType::ExternalUnknown
    } else {
        DeviceType::BuiltInWideAngleCamera
    }
}
