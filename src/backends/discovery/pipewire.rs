// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire device discovery
//!
//! Cameras and microphones are read from the PipeWire object graph as dumped
//! by `pw-dump`. Video sources come from the camera portal / libcamera / V4L2
//! SPA plugins, audio sources from ALSA and Bluetooth.

use super::types::{
    CaptureDevice, DevicePosition, DeviceType, DiscoveryFilter, MediaKind,
};
use super::DeviceDiscovery;
use crate::constants::discovery::{
    DEFAULT_DISCOVERY_TIMEOUT, MIN_DISCOVERY_TIMEOUT_MS, PW_DUMP_COMMAND,
};
use serde_json::Value;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How often to check whether a helper has exited after closing stdout
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Metadata keys naming the default sources
const DEFAULT_SOURCE_KEYS: [(&str, MediaKind); 4] = [
    ("default.audio.source", MediaKind::Audio),
    ("default.configured.audio.source", MediaKind::Audio),
    ("default.video.source", MediaKind::Video),
    ("default.configured.video.source", MediaKind::Video),
];

/// PipeWire discovery backend
#[derive(Debug, Clone)]
pub struct PipeWireDiscovery {
    timeout: Duration,
}

impl PipeWireDiscovery {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }

    /// Bound how long a single `pw-dump` run may take
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_millis(MIN_DISCOVERY_TIMEOUT_MS));
        self
    }

    /// Snapshot every capture device in the graph
    pub fn snapshot(&self) -> Vec<CaptureDevice> {
        let Some(stdout) = run_with_timeout(PW_DUMP_COMMAND, &[], self.timeout) else {
            return Vec::new();
        };

        match parse_pw_dump(&stdout) {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Failed to parse JSON from {}: {}", PW_DUMP_COMMAND, e);
                Vec::new()
            }
        }
    }
}

impl Default for PipeWireDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDiscovery for PipeWireDiscovery {
    fn discover(&self, filter: &DiscoveryFilter) -> Vec<CaptureDevice> {
        filter.apply(self.snapshot())
    }

    fn is_available(&self) -> bool {
        Command::new(PW_DUMP_COMMAND)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "pipewire"
    }
}

/// Run a helper process and collect stdout, killing it after `timeout`
///
/// The budget covers both reading stdout and waiting for the exit status.
fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Option<String> {
    let deadline = Instant::now() + timeout;
    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!("Failed to run {}: {}", program, e);
            return None;
        }
    };

    // Drain stdout on a helper thread so a large dump cannot fill the pipe
    let mut stdout = child.stdout.take()?;
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let result = stdout.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(result);
    });

    let output = match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            warn!("Failed to read {} output: {}", program, e);
            kill(&mut child);
            return None;
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "{} timed out", program);
            kill(&mut child);
            return None;
        }
    };

    // stdout can close before the process exits
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() < deadline => std::thread::sleep(EXIT_POLL_INTERVAL),
            Ok(None) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "{} did not exit in time", program
                );
                kill(&mut child);
                return None;
            }
            Err(e) => {
                warn!("Failed to wait for {}: {}", program, e);
                kill(&mut child);
                return None;
            }
        }
    };

    if !status.success() {
        warn!("{} command failed: {}", program, status);
        return None;
    }

    match String::from_utf8(output) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("Failed to parse {} output: {}", program, e);
            None
        }
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Parse `pw-dump` output into capture devices
///
/// Per media kind the default source comes first; the rest keep graph order.
pub fn parse_pw_dump(json: &str) -> Result<Vec<CaptureDevice>, serde_json::Error> {
    let objects: Vec<Value> = serde_json::from_str(json)?;

    let defaults = default_source_names(&objects);
    let mut devices: Vec<CaptureDevice> = objects
        .iter()
        .filter_map(|object| parse_node(object, &defaults))
        .collect();

    // Stable: non-default devices keep their relative order
    devices.sort_by_key(|d| !d.is_default);

    Ok(devices)
}

/// Node names of the default audio/video sources from the `default` metadata
fn default_source_names(objects: &[Value]) -> Vec<(MediaKind, String)> {
    let mut defaults = Vec::new();

    let Some(metadata) = objects.iter().find(|object| {
        object.get("type").and_then(Value::as_str) == Some("PipeWire:Interface:Metadata")
            && object
                .get("props")
                .and_then(|p| p.get("metadata.name"))
                .and_then(Value::as_str)
                == Some("default")
    }) else {
        return defaults;
    };

    let Some(entries) = metadata.get("metadata").and_then(Value::as_array) else {
        return defaults;
    };

    // Runtime defaults take precedence over configured ones
    for (key, kind) in DEFAULT_SOURCE_KEYS {
        if defaults.iter().any(|(k, _)| *k == kind) {
            continue;
        }
        let name = entries
            .iter()
            .find(|entry| entry.get("key").and_then(Value::as_str) == Some(key))
            .and_then(|entry| entry.get("value"))
            .and_then(|value| value.get("name"))
            .and_then(Value::as_str);

        if let Some(name) = name {
            debug!(key, default_source = %name, "Found default source from metadata");
            defaults.push((kind, name.to_string()));
        }
    }

    defaults
}

fn parse_node(object: &Value, defaults: &[(MediaKind, String)]) -> Option<CaptureDevice> {
    if object.get("type").and_then(Value::as_str) != Some("PipeWire:Interface:Node") {
        return None;
    }
    let props = object.get("info")?.get("props")?;
    let media_class = prop_string(props, "media.class")?;

    let (media_kind, is_virtual_class) = match media_class.as_str() {
        "Video/Source" => (MediaKind::Video, false),
        "Video/Source/Virtual" => (MediaKind::Video, true),
        "Audio/Source" => (MediaKind::Audio, false),
        "Audio/Source/Virtual" => (MediaKind::Audio, true),
        _ => return None,
    };

    let id = object.get("id").and_then(Value::as_u64).unwrap_or_default();
    let unique_id = match prop_string(props, "object.serial") {
        Some(serial) => format!("pipewire-serial-{}", serial),
        None => format!("pipewire-{}", id),
    };

    let node_name = prop_string(props, "node.name").unwrap_or_default();
    let name = prop_string(props, "node.nick")
        .or_else(|| prop_string(props, "node.description"))
        .or_else(|| (!node_name.is_empty()).then(|| node_name.clone()))
        .unwrap_or_else(|| match media_kind {
            MediaKind::Video => "Unknown Camera".to_string(),
            MediaKind::Audio => "Unknown Audio Device".to_string(),
        });

    let device_type = if is_virtual_class {
        DeviceType::Virtual
    } else {
        classify_node(props, media_kind)
    };

    let position = prop_string(props, "api.libcamera.location")
        .map(|location| DevicePosition::from_location(&location))
        .unwrap_or_default();

    let is_default = !node_name.is_empty()
        && defaults
            .iter()
            .any(|(kind, default)| *kind == media_kind && *default == node_name);

    let model_id = prop_string(props, "api.v4l2.cap.driver")
        .or_else(|| prop_string(props, "api.alsa.card.name"))
        .or_else(|| prop_string(props, "device.product.name"));

    let path = prop_string(props, "object.path");

    let device = CaptureDevice {
        unique_id,
        name,
        device_type,
        media_kind,
        position,
        is_default,
        model_id,
        path,
    };

    debug!(
        id,
        name = %device.name,
        unique_id = %device.unique_id,
        device_type = %device.device_type,
        is_default,
        "Found capture device"
    );
    Some(device)
}

/// Decide built-in vs external vs virtual from node properties
fn classify_node(props: &Value, media_kind: MediaKind) -> DeviceType {
    if prop_string(props, "api.v4l2.cap.driver").as_deref() == Some("v4l2 loopback") {
        return DeviceType::Virtual;
    }

    if prop_string(props, "api.libcamera.location").as_deref() == Some("external") {
        return DeviceType::ExternalUnknown;
    }

    let external_bus = ["device.bus", "api.v4l2.cap.bus_info", "device.bus-path", "object.path"]
        .iter()
        .filter_map(|key| prop_string(props, key))
        .any(|value| {
            let value = value.to_ascii_lowercase();
            value.starts_with("usb") || value.contains("bluetooth") || value.contains("bluez")
        });
    if external_bus || prop_string(props, "device.api").as_deref() == Some("bluez5") {
        return DeviceType::ExternalUnknown;
    }

    // Nodes created by applications have no backing device object
    if prop_string(props, "device.id").is_none() {
        return DeviceType::Virtual;
    }

    match media_kind {
        MediaKind::Video => DeviceType::BuiltInWideAngleCamera,
        MediaKind::Audio => DeviceType::BuiltInMicrophone,
    }
}

/// Read a property that PipeWire may encode as either a string or a number
fn prop_string(props: &Value, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
