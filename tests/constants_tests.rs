// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use capture_bridge::constants::{discovery, events};
use capture_bridge::{DeviceType, MediaKind};

#[test]
fn test_video_mapping() {
    assert_eq!(
        discovery::VIDEO_DEVICE_TYPES,
        [DeviceType::BuiltInWideAngleCamera, DeviceType::ExternalUnknown]
    );
    assert_eq!(
        MediaKind::Video.device_types(),
        &discovery::VIDEO_DEVICE_TYPES
    );
}

#[test]
fn test_audio_mapping() {
    assert_eq!(
        discovery::AUDIO_DEVICE_TYPES,
        [DeviceType::BuiltInMicrophone, DeviceType::ExternalUnknown]
    );
    assert_eq!(
        MediaKind::Audio.device_types(),
        &discovery::AUDIO_DEVICE_TYPES
    );
}

#[test]
fn test_virtual_devices_never_mapped() {
    // Loopback sources must not show up in media-kind lookups
    for kind in MediaKind::ALL {
        assert!(!kind.device_types().contains(&DeviceType::Virtual));
    }
}

#[test]
fn test_default_watch_interval_above_minimum() {
    assert!(events::DEFAULT_WATCH_INTERVAL_MS >= events::MIN_WATCH_INTERVAL_MS);
}
