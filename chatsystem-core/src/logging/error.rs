//! Error types for the logging subsystem

use thiserror::Error;

/// Errors that can occur in the logging subsystem
#[derive(Debug, Clone, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed, or the subscriber failed to build
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// Level or filter string could not be understood
    #[error("Invalid logging configuration: {0}")]
    InvalidConfiguration(String),
}
