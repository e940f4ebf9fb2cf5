//! Configuration error types for the config module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling the sniffer configuration.
///
/// All of these are fatal: they are reported before any monitor starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file named explicitly but not present
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read config file
    #[error("Failed to read configuration file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Output style is not one of the known names
    #[error("output style should be one of: {expected}")]
    InvalidOutputStyle { given: String, expected: String },

    /// Separator escape string could not be decoded
    #[error("Invalid separator '{input}': {message}")]
    InvalidSeparator { input: String, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    /// Environment variable parse error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParseError { var: String, message: String },
}

impl ConfigError {
    /// Create a validation error
    pub fn validation<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an env parse error
    pub fn env_parse<V: Into<String>, M: Into<String>>(var: V, message: M) -> Self {
        Self::EnvParseError {
            var: var.into(),
            message: message.into(),
        }
    }

    /// Create a separator decoding error
    pub fn separator<I: Into<String>, M: Into<String>>(input: I, message: M) -> Self {
        Self::InvalidSeparator {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
