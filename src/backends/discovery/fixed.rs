// SPDX-License-Identifier: GPL-3.0-only

//! In-memory discovery backend
//!
//! Serves a fixed device list, either built in code or loaded from a JSON
//! snapshot previously written by `capture-bridge list --json`.

use super::types::{CaptureDevice, DiscoveryFilter};
use super::DeviceDiscovery;
use crate::errors::{AppError, AppResult};
use std::path::Path;
use tracing::debug;

/// Discovery over a fixed device list
#[derive(Debug, Clone, Default)]
pub struct FixedDiscovery {
    devices: Vec<CaptureDevice>,
}

impl FixedDiscovery {
    pub fn new(devices: Vec<CaptureDevice>) -> Self {
        Self { devices }
    }

    /// Load a device snapshot (a JSON array of devices)
    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let devices: Vec<CaptureDevice> = serde_json::from_str(&contents)
            .map_err(|e| AppError::Snapshot(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), count = devices.len(), "Loaded device snapshot");
        Ok(Self::new(devices))
    }

    pub fn devices(&self) -> &[CaptureDevice] {
        &self.devices
    }
}

impl DeviceDiscovery for FixedDiscovery {
    fn discover(&self, filter: &DiscoveryFilter) -> Vec<CaptureDevice> {
        filter.apply(self.devices.clone())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
