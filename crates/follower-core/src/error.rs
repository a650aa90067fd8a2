//! Core error types for the follower tool.
//!
//! This module defines the central error type used by the run-level code.
//! Per-request failures never reach it; they are classified into
//! [`FollowOutcome`](crate::types::FollowOutcome) values at the client boundary.

use thiserror::Error;

/// Central error type for run-level failures.
#[derive(Error, Debug)]
pub enum FollowerError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential is missing or still the placeholder value
    #[error("authentication token is missing or is the placeholder")]
    MissingCredential,

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `FollowerError`.
pub type Result<T> = std::result::Result<T, FollowerError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
