//! Core error types for focusguard-core.
//!
//! Configuration problems are fatal at construction time and are rejected
//! before any ticks are processed. A missing capture frame is not an error
//! at all (the tick is skipped), so no variant exists for it.

use std::path::PathBuf;
use thiserror::Error;

use crate::tracker::InterventionChoice;

/// Core error type for focusguard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Intervention lifecycle errors
    #[error("Intervention error: {0}")]
    Intervention(#[from] InterventionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ConfigError {
    /// Shorthand for an `InvalidValue` error.
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Intervention lifecycle errors.
///
/// These indicate a collaborator bug (resolving a choice that was never
/// offered, or resolving twice) and fail loudly rather than being ignored.
#[derive(Error, Debug)]
pub enum InterventionError {
    /// No intervention is pending
    #[error("No intervention is pending for this session")]
    NotPending,

    /// The intervention was already resolved
    #[error("Intervention already resolved with choice '{previous:?}'")]
    AlreadyResolved { previous: InterventionChoice },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
