//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot encode config as TOML: {0}")]
    Encode(#[from] toml::ser::Error),

    /// An environment override was set but could not be parsed
    #[error("{var}={value:?} is invalid: {reason}")]
    BadOverride {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
