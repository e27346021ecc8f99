// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use capture_bridge::backends::discovery::DiscoveryBackendType;
use capture_bridge::{AppError, Config};
use std::path::PathBuf;
use std::time::Duration;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("capture-bridge-config-{}-{}", name, std::process::id()))
        .join("config.json")
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.backend, DiscoveryBackendType::PipeWire);
    assert_eq!(config.channel_name, "capture_bridge/devices");
    assert_eq!(config.log_filter, "warn");
    assert_eq!(config.watch_interval(), Duration::from_millis(2000));
}

#[test]
fn test_missing_file_gives_defaults() {
    let config = Config::load_from(&temp_path("missing")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_load() {
    let path = temp_path("roundtrip");
    let config = Config {
        backend: DiscoveryBackendType::V4l2,
        channel_name: "camera/events".to_string(),
        ..Config::default()
    };

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();
    std::fs::remove_dir_all(path.parent().unwrap()).ok();

    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let path = temp_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "backend": "v4l2", "unknown_key": 1 }"#).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    std::fs::remove_dir_all(path.parent().unwrap()).ok();

    assert_eq!(loaded.backend, DiscoveryBackendType::V4l2);
    assert_eq!(loaded.channel_name, Config::default().channel_name);
}

#[test]
fn test_malformed_file_is_config_error() {
    let path = temp_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "backend = pipewire").unwrap();

    let result = Config::load_from(&path);
    std::fs::remove_dir_all(path.parent().unwrap()).ok();

    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_watch_interval_is_clamped() {
    let config = Config {
        watch_interval_ms: 0,
        ..Config::default()
    };
    assert_eq!(config.watch_interval(), Duration::from_millis(100));
}

#[test]
fn test_discovery_timeout_is_clamped() {
    let config = Config {
        discovery_timeout_ms: 0,
        ..Config::default()
    };
    assert_eq!(config.discovery_timeout(), Duration::from_millis(100));

    let config = Config {
        discovery_timeout_ms: 750,
        ..Config::default()
    };
    assert_eq!(config.discovery_timeout(), Duration::from_millis(750));
}
