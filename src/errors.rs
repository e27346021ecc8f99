// SPDX-License-Identifier: GPL-3.0-only

//! Error types for configuration, snapshots and the CLI
//!
//! Discovery itself never fails: a missing device is an empty result.

use crate::events::ChannelError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Config file could not be parsed or written
    #[error("Configuration error: {0}")]
    Config(String),
    /// Device snapshot file is malformed
    #[error("Snapshot error: {0}")]
    Snapshot(String),
    /// Channel setup failed
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
    /// Serialization of output payloads failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Storage/filesystem errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_conversion() {
        let err: AppError = ChannelError::new("invalid-channel", None, None).into();
        assert!(matches!(err, AppError::Channel(_)));
        assert!(err.to_string().starts_with("Channel error: invalid-channel"));
    }

    #[test]
    fn test_io_error_is_storage() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
