//! Core error types for typhoon-core.
//!
//! Configuration problems are fatal and surface once, at startup. Degenerate
//! sensor input is never fatal: the offending tick is skipped and the caller
//! receives an [`InputError`] to report as a warning.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for typhoon-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Degenerate sensor input
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Actuation device errors
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// A recorded motion file could not be parsed
    #[error("Replay line {line}: {message}")]
    Replay { line: usize, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key not present in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// A sample the session refused to apply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Magnitude was negative, NaN or infinite
    #[error("Degenerate magnitude {magnitude} at {timestamp:?}")]
    InvalidMagnitude { magnitude: f64, timestamp: Duration },

    /// Timestamp went backwards relative to the last applied sample
    #[error("Non-monotonic timestamp {timestamp:?} (previous {previous:?})")]
    NonMonotonicTimestamp {
        timestamp: Duration,
        previous: Duration,
    },
}

/// Errors raised by an actuation sink.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The device refused or failed to take the command
    #[error("Failed to send rumble command: {0}")]
    SendFailed(String),

    /// Underlying channel failure
    #[error("Device IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
