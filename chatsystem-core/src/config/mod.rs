//! Configuration management for ChatSystem
//!
//! Layering, lowest precedence first: built-in defaults, an optional TOML
//! file, `CHATSYSTEM_*` environment variables. The server binary applies its
//! command line flags on top of the result.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Everything the server binary reads at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `127.0.0.1:3000` unless overridden
    pub bind_address: SocketAddr,

    /// Grace period for in-flight requests once shutdown starts
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,

    /// Largest accepted JSON request body in bytes
    pub max_body_bytes: usize,
}

/// Subscriber settings; see [`crate::logging::LogConfig`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`
    pub level: String,

    /// Emit JSON lines
    pub json_format: bool,

    pub with_timestamp: bool,

    pub with_target: bool,
}

/// `metrics` facade settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Register metric descriptions at startup
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            shutdown_timeout: Duration::from_secs(10),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_timestamp: true,
            with_target: true,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from defaults plus environment variables
    ///
    /// Environment variables follow the pattern: CHATSYSTEM_<SECTION>_<KEY>
    /// Example: CHATSYSTEM_SERVER_BIND_ADDRESS=0.0.0.0:3000
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&contents)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `CHATSYSTEM_*` variables onto this configuration
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
            self.server.bind_address = parse_override(ENV_BIND_ADDRESS, addr, |v| v.parse())?;
        }
        if let Some(timeout) = lookup(ENV_SHUTDOWN_TIMEOUT) {
            self.server.shutdown_timeout = parse_override(ENV_SHUTDOWN_TIMEOUT, timeout, |v| {
                humantime_serde::re::humantime::parse_duration(v)
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            self.logging.json_format = parse_override(ENV_LOG_JSON, json, |v| v.parse::<bool>())?;
        }
        if let Some(enabled) = lookup(ENV_METRICS_ENABLED) {
            self.metrics.enabled =
                parse_override(ENV_METRICS_ENABLED, enabled, |v| v.parse::<bool>())?;
        }
        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_body_bytes must be > 0".into()));
        }
        if let Err(e) = self.logging.level.parse::<LogLevel>() {
            return Err(ConfigError::Invalid(format!("logging.level: {}", e)));
        }
        Ok(())
    }

    /// Write this configuration as pretty TOML
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

const ENV_BIND_ADDRESS: &str = "CHATSYSTEM_SERVER_BIND_ADDRESS";
const ENV_SHUTDOWN_TIMEOUT: &str = "CHATSYSTEM_SERVER_SHUTDOWN_TIMEOUT";
const ENV_LOG_LEVEL: &str = "CHATSYSTEM_LOG_LEVEL";
const ENV_LOG_JSON: &str = "CHATSYSTEM_LOG_JSON";
const ENV_METRICS_ENABLED: &str = "CHATSYSTEM_METRICS_ENABLED";

fn parse_override<T, E, P>(var: &'static str, value: String, parse: P) -> Result<T, ConfigError>
where
    E: std::fmt::Display,
    P: FnOnce(&str) -> Result<T, E>,
{
    parse(&value).map_err(|e| ConfigError::BadOverride {
        var,
        reason: e.to_string(),
        value,
    })
}
