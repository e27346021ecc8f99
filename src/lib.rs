// SPDX-License-Identifier: GPL-3.0-only

//! capture-bridge - camera and microphone discovery with an event channel bridge
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: Host device discovery (PipeWire, V4L2, fixed snapshots)
//! - [`events`]: Single-listener event bridge and named channels
//! - [`watcher`]: Publishes device list changes on an event channel
//! - [`config`]: User configuration handling
//! - [`constants`]: Device type mapping and defaults
//! - [`errors`]: Error types
//!
//! # Example
//!
//! ```no_run
//! use capture_bridge::backends::discovery::{DeviceEnumerator, DiscoveryBackendType, MediaKind};
//!
//! let enumerator = DeviceEnumerator::for_backend(DiscoveryBackendType::PipeWire);
//! if let Some(camera) = enumerator.find_device_by_media_kind(MediaKind::Video) {
//!     println!("default camera: {}", camera.name);
//! }
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod watcher;

// Re-export commonly used types
pub use backends::discovery::{
    CaptureDevice, DeviceDiscovery, DeviceEnumerator, DeviceType, MediaKind,
};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use events::{ChannelError, ChannelRegistry, EventBridge, EventSink, StreamEvent};
pub use watcher::DeviceWatcher;
