// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::discovery::DiscoveryBackendType;
use crate::constants::{discovery, events, logging};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Directory name under the user config dir
const CONFIG_DIR_NAME: &str = "capture-bridge";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discovery backend to use (PipeWire or V4L2)
    pub backend: DiscoveryBackendType,
    /// Channel the device watcher publishes on
    pub channel_name: String,
    /// Watcher re-query interval in milliseconds
    pub watch_interval_ms: u64,
    /// Upper bound for one discovery query in milliseconds
    pub discovery_timeout_ms: u64,
    /// tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: DiscoveryBackendType::default(),
            channel_name: events::DEFAULT_CHANNEL_NAME.to_string(),
            watch_interval_ms: events::DEFAULT_WATCH_INTERVAL_MS,
            discovery_timeout_ms: discovery::DEFAULT_DISCOVERY_TIMEOUT.as_millis() as u64,
            log_filter: logging::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Default location: `~/.config/capture-bridge/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Watcher interval, clamped to a sane minimum
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms.max(events::MIN_WATCH_INTERVAL_MS))
    }

    /// Discovery timeout, clamped to a sane minimum
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms.max(discovery::MIN_DISCOVERY_TIMEOUT_MS))
    }
}
