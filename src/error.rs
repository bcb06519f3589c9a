//! Unified error types for rategate.
//!
//! Storage failures always propagate: a counter that cannot be read is an
//! error, never a silent zero. Only configuration loading is fail-open.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rategate operations.
#[derive(Error, Debug)]
pub enum RateGateError {
    /// I/O errors from counter store or config file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading or validation errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Engine invariants that could not be upheld (e.g. a poisoned lock).
    #[error("invalid state: {message}")]
    InvalidState { message: String },
}

/// A specialized Result type for rategate operations.
pub type Result<T> = std::result::Result<T, RateGateError>;

impl RateGateError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Whether this error came from the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Serde { .. })
    }
}

impl From<io::Error> for RateGateError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for RateGateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Fail-open handling for non-essential operations.
///
/// Used for configuration loading, where a broken file should fall back to
/// defaults instead of stopping the host application.
pub trait FailOpen<T> {
    /// Log a warning and return the provided fallback on error.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the rategate CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command failed (storage, config, or usage error).
    pub const ERROR: i32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = RateGateError::storage(
            "/tmp/state.json",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/state.json"));
    }

    #[test]
    fn test_serde_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RateGateError::from(json_err);
        assert!(err.to_string().starts_with("serialization error: "));
    }

    #[test]
    fn test_config_error_display() {
        let err = RateGateError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_invalid_state_error_display() {
        let err = RateGateError::invalid_state("engine lock poisoned");
        assert_eq!(err.to_string(), "invalid state: engine lock poisoned");
    }

    #[test]
    fn test_is_storage() {
        assert!(RateGateError::storage("/x", io::Error::other("boom")).is_storage());
        let json_err = serde_json::from_str::<serde_json::Value>("bad").unwrap_err();
        assert!(RateGateError::from(json_err).is_storage());
        assert!(!RateGateError::config("bad").is_storage());
        assert!(!RateGateError::invalid_state("bad").is_storage());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: RateGateError = io_err.into();
        assert!(matches!(err, RateGateError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: RateGateError = json_err.into();
        assert!(matches!(err, RateGateError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<i32> = Err(RateGateError::config("test"));
        assert_eq!(result.fail_open_with("test context", 42), 42);
    }

    #[test]
    fn test_fail_open_success() {
        let result: Result<i32> = Ok(100);
        assert_eq!(result.fail_open_with("test context", 0), 100);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ERROR, 1);
    }
}
