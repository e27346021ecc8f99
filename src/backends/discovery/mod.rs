// SPDX-License-Identifier: GPL-3.0-only

//! Capture device discovery
//!
//! Host discovery sits behind the [`DeviceDiscovery`] trait so the platform
//! mechanism can be swapped without touching callers.
//!
//! ```text
//! ┌─────────────────────┐
//! │   Caller (CLI/App)  │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  DeviceEnumerator   │  ← media-kind mapping, first/all projections
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │DeviceDiscovery Trait│  ← discover(filter) -> devices
//! └──────────┬──────────┘
//!            │
//!     ┌──────┼──────┐
//!     ▼      ▼      ▼
//! PipeWire  V4L2  Fixed
//! ```

pub mod fixed;
pub mod pipewire;
pub mod types;
pub mod v4l2;

pub use fixed::FixedDiscovery;
pub use pipewire::PipeWireDiscovery;
pub use types::*;
pub use v4l2::V4l2Discovery;

use tracing::debug;

/// Host device discovery
///
/// Implementations query current host state on every call. Ordering of the
/// returned list is the host's discovery order (default device first where
/// the host reports one). Failures are logged and surface as an empty list.
pub trait DeviceDiscovery: Send + Sync {
    /// List devices matching the filter
    fn discover(&self, filter: &DiscoveryFilter) -> Vec<CaptureDevice>;

    /// Check whether the host mechanism behind this backend is present
    fn is_available(&self) -> bool;

    /// Human readable backend name for logs
    fn name(&self) -> &'static str;
}

/// Get a concrete backend instance for the given type
pub fn get_backend_for_type(backend_type: DiscoveryBackendType) -> Box<dyn DeviceDiscovery> {
    match backend_type {
        DiscoveryBackendType::PipeWire => Box::new(PipeWireDiscovery::new()),
        DiscoveryBackendType::V4l2 => Box::new(V4l2Discovery::new()),
    }
}

/// Media-kind aware queries over a discovery backend
pub struct DeviceEnumerator {
    backend: Box<dyn DeviceDiscovery>,
}

impl DeviceEnumerator {
    pub fn new(backend: Box<dyn DeviceDiscovery>) -> Self {
        Self { backend }
    }

    /// Create an enumerator over one of the host backends
    pub fn for_backend(backend_type: DiscoveryBackendType) -> Self {
        Self::new(get_backend_for_type(backend_type))
    }

    pub fn backend(&self) -> &dyn DeviceDiscovery {
        self.backend.as_ref()
    }

    /// All devices of the given types, in discovery order
    ///
    /// An empty `device_types` yields an empty list without querying the host.
    pub fn find_all_devices(
        &self,
        device_types: &[DeviceType],
        media_kind: Option<MediaKind>,
    ) -> Vec<CaptureDevice> {
        if device_types.is_empty() {
            debug!("Empty device type set, skipping discovery");
            return Vec::new();
        }

        let filter = DiscoveryFilter::new(device_types, media_kind);
        let devices = self.backend.discover(&filter);
        debug!(
            backend = self.backend.name(),
            ?device_types,
            media_kind = ?media_kind,
            count = devices.len(),
            "Discovered devices"
        );
        devices
    }

    /// First device of the given types and media kind
    pub fn find_first_device(
        &self,
        device_types: &[DeviceType],
        media_kind: MediaKind,
    ) -> Option<CaptureDevice> {
        self.find_all_devices(device_types, Some(media_kind))
            .into_iter()
            .next()
    }

    /// First device for a media kind, using the built-in type mapping
    pub fn find_device_by_media_kind(&self, media_kind: MediaKind) -> Option<CaptureDevice> {
        self.find_first_device(media_kind.device_types(), media_kind)
    }

    /// All devices for a media kind, or cameras followed by microphones
    ///
    /// With no media kind the video and audio queries run separately, each
    /// with its own type mapping, and the video results come first.
    pub fn find_all_devices_by_media_kind(
        &self,
        media_kind: Option<MediaKind>,
    ) -> Vec<CaptureDevice> {
        match media_kind {
            Some(kind) => self.find_all_devices(kind.device_types(), Some(kind)),
            None => MediaKind::ALL
                .iter()
                .flat_map(|kind| self.find_all_devices(kind.device_types(), Some(*kind)))
                .collect(),
        }
    }
}

impl std::fmt::Debug for DeviceEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceEnumerator")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that counts host queries
    struct CountingDiscovery {
        inner: FixedDiscovery,
        calls: Arc<AtomicUsize>,
    }

    impl DeviceDiscovery for CountingDiscovery {
        fn discover(&self, filter: &DiscoveryFilter) -> Vec<CaptureDevice> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.discover(filter)
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn camera(id: &str) -> CaptureDevice {
        CaptureDevice {
            unique_id: id.to_string(),
            name: id.to_string(),
            device_type: DeviceType::BuiltInWideAngleCamera,
            media_kind: MediaKind::Video,
            position: DevicePosition::Unspecified,
            is_default: false,
            model_id: None,
            path: None,
        }
    }

    fn counting(devices: Vec<CaptureDevice>) -> (DeviceEnumerator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = CountingDiscovery {
            inner: FixedDiscovery::new(devices),
            calls: Arc::clone(&calls),
        };
        (DeviceEnumerator::new(Box::new(backend)), calls)
    }

    #[test]
    fn test_empty_types_skip_backend() {
        let (enumerator, calls) = counting(vec![camera("a")]);
        assert!(enumerator.find_all_devices(&[], Some(MediaKind::Video)).is_empty());
        assert!(enumerator.find_first_device(&[], MediaKind::Video).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_every_call_requeries() {
        let (enumerator, calls) = counting(vec![camera("a")]);
        enumerator.find_device_by_media_kind(MediaKind::Video);
        enumerator.find_device_by_media_kind(MediaKind::Video);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_absent_kind_queries_video_then_audio() {
        let (enumerator, calls) = counting(vec![camera("a")]);
        enumerator.find_all_devices_by_media_kind(None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
