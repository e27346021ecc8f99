// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for media-kind device lookups

use capture_bridge::backends::discovery::{
    CaptureDevice, DeviceEnumerator, DevicePosition, DeviceType, FixedDiscovery, MediaKind,
};

fn device(id: &str, device_type: DeviceType, media_kind: MediaKind) -> CaptureDevice {
    CaptureDevice {
        unique_id: id.to_string(),
        name: id.to_string(),
        device_type,
        media_kind,
        position: DevicePosition::Unspecified,
        is_default: false,
        model_id: None,
        path: None,
    }
}

/// Host order deliberately interleaves kinds and starts with audio
fn host_devices() -> Vec<CaptureDevice> {
    vec![
        device("usb-mic", DeviceType::ExternalUnknown, MediaKind::Audio),
        device("usb-cam", DeviceType::ExternalUnknown, MediaKind::Video),
        device("internal-mic", DeviceType::BuiltInMicrophone, MediaKind::Audio),
        device("loopback", DeviceType::Virtual, MediaKind::Video),
        device("webcam", DeviceType::BuiltInWideAngleCamera, MediaKind::Video),
    ]
}

fn enumerator(devices: Vec<CaptureDevice>) -> DeviceEnumerator {
    DeviceEnumerator::new(Box::new(FixedDiscovery::new(devices)))
}

fn ids(devices: &[CaptureDevice]) -> Vec<&str> {
    devices.iter().map(|d| d.unique_id.as_str()).collect()
}

#[test]
fn test_find_all_keeps_host_order() {
    let enumerator = enumerator(host_devices());
    let video = enumerator.find_all_devices(
        &[DeviceType::BuiltInWideAngleCamera, DeviceType::ExternalUnknown],
        Some(MediaKind::Video),
    );
    assert_eq!(ids(&video), vec!["usb-cam", "webcam"]);
}

#[test]
fn test_find_all_without_kind_spans_kinds() {
    let enumerator = enumerator(host_devices());
    let external = enumerator.find_all_devices(&[DeviceType::ExternalUnknown], None);
    assert_eq!(ids(&external), vec!["usb-mic", "usb-cam"]);
}

#[test]
fn test_first_is_head_of_list() {
    let enumerator = enumerator(host_devices());
    let type_sets: [&[DeviceType]; 4] = [
        &[DeviceType::BuiltInWideAngleCamera],
        &[DeviceType::ExternalUnknown],
        &[DeviceType::BuiltInMicrophone, DeviceType::ExternalUnknown],
        &[DeviceType::Virtual],
    ];

    for types in type_sets {
        for kind in MediaKind::ALL {
            let all = enumerator.find_all_devices(types, Some(kind));
            let first = enumerator.find_first_device(types, kind);
            assert_eq!(first.as_ref(), all.first(), "types {:?} kind {}", types, kind);
        }
    }
}

#[test]
fn test_empty_type_set_is_absent() {
    let enumerator = enumerator(host_devices());
    assert!(enumerator.find_first_device(&[], MediaKind::Video).is_none());
    assert!(enumerator.find_all_devices(&[], None).is_empty());
}

#[test]
fn test_media_kind_shortcut_matches_explicit_types() {
    let enumerator = enumerator(host_devices());
    assert_eq!(
        enumerator.find_device_by_media_kind(MediaKind::Video),
        enumerator.find_first_device(
            &[DeviceType::BuiltInWideAngleCamera, DeviceType::ExternalUnknown],
            MediaKind::Video
        )
    );
    assert_eq!(
        enumerator
            .find_device_by_media_kind(MediaKind::Audio)
            .map(|d| d.unique_id),
        Some("usb-mic".to_string())
    );
}

#[test]
fn test_absent_kind_lists_video_then_audio() {
    let enumerator = enumerator(host_devices());
    let all = enumerator.find_all_devices_by_media_kind(None);

    let mut expected = enumerator.find_all_devices(
        &[DeviceType::BuiltInWideAngleCamera, DeviceType::ExternalUnknown],
        Some(MediaKind::Video),
    );
    expected.extend(enumerator.find_all_devices(
        &[DeviceType::BuiltInMicrophone, DeviceType::ExternalUnknown],
        Some(MediaKind::Audio),
    ));

    assert_eq!(all, expected);
    assert_eq!(ids(&all), vec!["usb-cam", "webcam", "usb-mic", "internal-mic"]);
}

#[test]
fn test_present_kind_uses_mapping() {
    let enumerator = enumerator(host_devices());
    let audio = enumerator.find_all_devices_by_media_kind(Some(MediaKind::Audio));
    assert_eq!(ids(&audio), vec!["usb-mic", "internal-mic"]);
}

#[test]
fn test_virtual_sources_excluded_from_kind_lookups() {
    let enumerator = enumerator(vec![device("loopback", DeviceType::Virtual, MediaKind::Video)]);
    assert!(enumerator.find_device_by_media_kind(MediaKind::Video).is_none());
    assert!(enumerator.find_all_devices_by_media_kind(None).is_empty());
}

#[test]
fn test_no_devices() {
    let enumerator = enumerator(Vec::new());
    assert!(enumerator.find_device_by_media_kind(MediaKind::Audio).is_none());
    assert!(enumerator.find_all_devices_by_media_kind(None).is_empty());
}
