//! Error types for the settings crate.

use std::io;
use thiserror::Error;

/// Errors that can occur during configuration operations. These describe a
/// bad environment (missing file, unknown coolant, corrupt content),
/// distinct from parameter validation errors which describe bad user
/// input.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be loaded.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// The configuration file could not be saved.
    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A coolant name was requested that the catalog does not define.
    #[error("Unknown coolant option: {0}")]
    UnknownCoolant(String),

    /// The configured defaults fail parameter validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
