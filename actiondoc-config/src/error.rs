//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is not acceptable.
    #[error("invalid configuration value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
