// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application version (from git describe, see build.rs)
pub fn app_version() -> &'static str {
    env!("GIT_VERSION")
}

/// Device discovery
pub mod discovery {
    use super::Duration;
    use crate::backends::discovery::DeviceType;

    /// Device types searched for cameras when only the media kind is known
    pub const VIDEO_DEVICE_TYPES: [DeviceType; 2] = [
        DeviceType::BuiltInWideAngleCamera,
        DeviceType::ExternalUnknown,
    ];

    /// Device types searched for microphones when only the media kind is known
    pub const AUDIO_DEVICE_TYPES: [DeviceType; 2] =
        [DeviceType::BuiltInMicrophone, DeviceType::ExternalUnknown];

    /// PipeWire graph dump helper
    pub const PW_DUMP_COMMAND: &str = "pw-dump";

    /// Upper bound for one host discovery query
    pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_millis(3000);

    /// Shortest timeout a config may ask for; below this no helper can answer
    pub const MIN_DISCOVERY_TIMEOUT_MS: u64 = 100;
}

/// Event channels
pub mod events {
    /// Channel the device watcher publishes on
    pub const DEFAULT_CHANNEL_NAME: &str = "capture_bridge/devices";

    /// Event name for a changed device list
    pub const DEVICES_CHANGED: &str = "devices-changed";

    /// Error code sent when no device of the watched kind is left
    pub const NO_DEVICES: &str = "no-devices";

    /// Default re-query interval for the watcher
    pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 2000;

    /// Lower bound so a bad config cannot spin the host
    pub const MIN_WATCH_INTERVAL_MS: u64 = 100;
}

/// Logging
pub mod logging {
    /// Filter used when neither RUST_LOG nor the config sets one
    pub const DEFAULT_LOG_FILTER: &str = "warn";
}
