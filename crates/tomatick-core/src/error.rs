//! Core error types for tomatick-core.
//!
//! The timer state machine itself is total; errors only arise at its
//! boundaries (configuration input, task positions typed by the user,
//! and side-effect sinks).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomatick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
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

    /// Key does not name a setting
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No directory to keep the configuration in
    #[error("Cannot determine configuration directory: {0}")]
    NoConfigDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Position outside the list shown to the user
    #[error("No {collection} at position {index} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures of best-effort side-effect sinks.
///
/// These never leave the effect bus; they are logged and dropped.
#[derive(Error, Debug)]
pub enum EffectError {
    /// The platform has no way to perform the effect
    #[error("{0} is not supported on this platform")]
    Unsupported(String),

    /// The platform refused the effect
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A helper process died before it could take effect
    #[error("{0} exited immediately")]
    Exited(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
