//! Logging subsystem for ChatSystem
//!
//! Thin setup layer over `tracing-subscriber`. The rest of the crate only uses
//! the `tracing` macros; this module decides where and how the events end up.

use crate::config::LoggingConfig;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

mod error;
mod level;

pub use error::LoggingError;
pub use level::LogLevel;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Subscriber settings, resolved from [`LoggingConfig`] or built by hand
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Threshold used when `RUST_LOG` is unset
    pub level: LogLevel,
    pub with_timestamp: bool,
    /// Print the emitting module path (`chatsystem_core::core_chat::registry`)
    pub with_target: bool,
    /// One JSON object per line instead of human-readable text
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_timestamp: true,
            with_target: true,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Defaults with a different threshold
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.with_timestamp = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let target = self.with_target;
        match (self.json_format, self.with_timestamp) {
            (true, true) => fmt::layer().json().with_target(target).boxed(),
            (true, false) => fmt::layer().json().without_time().with_target(target).boxed(),
            (false, true) => fmt::layer().with_target(target).boxed(),
            (false, false) => fmt::layer().without_time().with_target(target).boxed(),
        }
    }
}

impl TryFrom<&LoggingConfig> for LogConfig {
    type Error = LoggingError;

    fn try_from(config: &LoggingConfig) -> Result<Self, Self::Error> {
        Ok(LogConfig::new(config.level.parse()?)
            .with_timestamp(config.with_timestamp)
            .with_target(config.with_target)
            .json_format(config.json_format))
    }
}

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` takes precedence over `config.level` when it is set.
///
/// # Example
/// ```
/// use chatsystem_core::logging::{init_logging_with_config, LogConfig, LogLevel};
///
/// let quiet = LogConfig::new(LogLevel::Warn).with_target(false);
/// init_logging_with_config(quiet).unwrap();
///
/// // Only one global subscriber per process
/// assert!(init_logging_with_config(LogConfig::default()).is_err());
/// ```
pub fn init_logging_with_config(config: LogConfig) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(env_filter)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}
