// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the event bridge and channel registry

use capture_bridge::events::{ChannelError, ChannelRegistry, EventBridge, StreamEvent};
use futures::channel::mpsc::{self, TryRecvError};
use serde_json::json;

#[test]
fn test_replacement_sink_gets_events() {
    let bridge = EventBridge::new("devices");
    let (tx_a, mut rx_a) = mpsc::unbounded::<StreamEvent>();
    let (tx_b, mut rx_b) = mpsc::unbounded::<StreamEvent>();

    bridge.register(Box::new(tx_a));
    bridge.register(Box::new(tx_b));
    bridge.emit(json!("x"));

    assert_eq!(rx_b.try_recv(), Ok(StreamEvent::Event(json!("x"))));
    // The first sink was dropped on replacement: closed and empty
    assert_eq!(rx_a.try_recv(), Err(TryRecvError::Closed));
}

#[test]
fn test_no_delivery_while_detached() {
    let bridge = EventBridge::new("devices");
    bridge.emit(json!({"ignored": true}));
    bridge.emit_error("E0", Some("nobody listens"), None);

    let (tx, mut rx) = mpsc::unbounded::<StreamEvent>();
    bridge.register(Box::new(tx));
    bridge.unregister();
    bridge.emit(json!(1));
    bridge.emit_error("E1", None, None);

    assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
}

#[test]
fn test_unregister_twice_is_noop() {
    let bridge = EventBridge::new("devices");
    bridge.unregister();
    bridge.unregister();
    assert!(!bridge.is_attached());

    let (tx, _rx) = mpsc::unbounded::<StreamEvent>();
    bridge.register(Box::new(tx));
    bridge.unregister();
    bridge.unregister();
    assert!(!bridge.is_attached());
}

#[test]
fn test_error_then_cancel_scenario() {
    let bridge = EventBridge::new("devices");
    let (tx, mut rx) = mpsc::unbounded::<StreamEvent>();
    bridge.register(Box::new(tx));

    bridge.emit_error("E1", Some("boom"), None);
    assert_eq!(
        rx.try_recv(),
        Ok(StreamEvent::Error(ChannelError {
            code: "E1".to_string(),
            message: Some("boom".to_string()),
            details: None,
        }))
    );

    bridge.unregister();
    bridge.emit_error("E2", Some("x"), None);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
}

#[test]
fn test_bridge_over_registry() {
    let registry = ChannelRegistry::new();
    let bridge = EventBridge::register_on("camera/frames", &registry).unwrap();
    assert!(registry.has_handler("camera/frames"));

    let (tx, mut rx) = mpsc::unbounded::<StreamEvent>();
    registry.listen("camera/frames", None, Box::new(tx)).unwrap();
    assert!(bridge.is_attached());

    bridge.emit(json!({"width": 640}));
    assert_eq!(
        rx.try_recv(),
        Ok(StreamEvent::Event(json!({"width": 640})))
    );

    registry.cancel("camera/frames", None).unwrap();
    assert!(!bridge.is_attached());
    bridge.emit(json!({"width": 1280}));
    assert_eq!(rx.try_recv(), Err(TryRecvError::Closed));
}

#[test]
fn test_blank_channel_name_rejected() {
    let registry = ChannelRegistry::new();
    let err = EventBridge::register_on("", &registry).unwrap_err();
    assert_eq!(err.code, "invalid-channel");
}

#[test]
fn test_concurrent_emit_and_register() {
    use std::sync::Arc;

    let bridge = Arc::new(EventBridge::new("devices"));
    let (tx, mut rx) = mpsc::unbounded::<StreamEvent>();
    bridge.register(Box::new(tx));

    let emitter = {
        let bridge = Arc::clone(&bridge);
        std::thread::spawn(move || {
            for i in 0..1000 {
                bridge.emit(json!(i));
            }
        })
    };
    let toggler = {
        let bridge = Arc::clone(&bridge);
        std::thread::spawn(move || {
            for _ in 0..100 {
                let (tx, _rx) = mpsc::unbounded::<StreamEvent>();
                bridge.register(Box::new(tx));
                bridge.unregister();
            }
        })
    };

    emitter.join().unwrap();
    toggler.join().unwrap();

    // Whatever reached the first sink arrived in order
    let mut last = -1i64;
    while let Ok(StreamEvent::Event(value)) = rx.try_recv() {
        let n = value.as_i64().unwrap();
        assert!(n > last);
        last = n;
    }
}
