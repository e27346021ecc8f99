// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for device discovery backends

use serde::{Deserialize, Serialize};

/// Hardware category of a capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Camera built into the machine (laptop webcam, phone sensor)
    BuiltInWideAngleCamera,
    /// Microphone built into the machine
    BuiltInMicrophone,
    /// Anything attached over USB, Bluetooth or another external bus
    ExternalUnknown,
    /// Software source with no hardware behind it (loopback, virtual sinks)
    Virtual,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::BuiltInWideAngleCamera => write!(f, "built-in camera"),
            DeviceType::BuiltInMicrophone => write!(f, "built-in microphone"),
            DeviceType::ExternalUnknown => write!(f, "external"),
            DeviceType::Virtual => write!(f, "virtual"),
        }
    }
}

/// Media carried by a capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Video, MediaKind::Audio];

    /// Device types searched when a caller only names a media kind
    pub fn device_types(&self) -> &'static [DeviceType] {
        match self {
            MediaKind::Video => &crate::constants::discovery::VIDEO_DEVICE_TYPES,
            MediaKind::Audio => &crate::constants::discovery::AUDIO_DEVICE_TYPES,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "camera" => Ok(MediaKind::Video),
            "audio" | "microphone" | "mic" => Ok(MediaKind::Audio),
            other => Err(format!("unknown media kind '{}'", other)),
        }
    }
}

/// Physical placement of a device relative to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePosition {
    /// Unknown, or "any position" when used in a filter
    #[default]
    Unspecified,
    Front,
    Back,
}

impl DevicePosition {
    /// Parse a libcamera location property ("front", "back", "external")
    pub fn from_location(location: &str) -> Self {
        match location.trim() {
            "front" => DevicePosition::Front,
            "back" => DevicePosition::Back,
            _ => DevicePosition::Unspecified,
        }
    }
}

/// A discovered capture device
///
/// This is a snapshot taken at discovery time. The host keeps ownership of
/// the hardware; nothing here holds the device open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDevice {
    /// Stable identifier within one backend (e.g. `pipewire-serial-42`, `/dev/video0`)
    pub unique_id: String,
    /// Human readable name
    pub name: String,
    pub device_type: DeviceType,
    pub media_kind: MediaKind,
    #[serde(default)]
    pub position: DevicePosition,
    /// True if the host reports this as the default source for its media kind
    #[serde(default)]
    pub is_default: bool,
    /// Driver or card name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Device node or host object path, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl std::fmt::Display for CaptureDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.media_kind, self.device_type)
    }
}

/// Query passed to a discovery backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFilter {
    pub device_types: Vec<DeviceType>,
    /// `None` accepts any media kind
    pub media_kind: Option<MediaKind>,
    /// `Unspecified` accepts any position
    pub position: DevicePosition,
}

impl DiscoveryFilter {
    pub fn new(device_types: &[DeviceType], media_kind: Option<MediaKind>) -> Self {
        Self {
            device_types: device_types.to_vec(),
            media_kind,
            position: DevicePosition::Unspecified,
        }
    }

    /// Check whether a device satisfies every constraint of this filter
    pub fn matches(&self, device: &CaptureDevice) -> bool {
        self.device_types.contains(&device.device_type)
            && self.media_kind.is_none_or(|kind| kind == device.media_kind)
            && (self.position == DevicePosition::Unspecified || self.position == device.position)
    }

    /// Keep matching devices, preserving order
    pub fn apply(&self, devices: Vec<CaptureDevice>) -> Vec<CaptureDevice> {
        devices.into_iter().filter(|d| self.matches(d)).collect()
    }
}

/// Discovery backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryBackendType {
    /// PipeWire object graph (cameras and microphones)
    #[default]
    PipeWire,
    /// Raw V4L2 device nodes (cameras only)
    V4l2,
}

impl std::fmt::Display for DiscoveryBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryBackendType::PipeWire => write!(f, "PipeWire"),
            DiscoveryBackendType::V4l2 => write!(f, "V4L2"),
        }
    }
}

impl std::str::FromStr for DiscoveryBackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pipewire" | "pw" => Ok(DiscoveryBackendType::PipeWire),
            "v4l2" | "v4l" => Ok(DiscoveryBackendType::V4l2),
            other => Err(format!("unknown discovery backend '{}'", other)),
        }
    }
}
