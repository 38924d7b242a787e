//! Configuration Error Types
//!
//! Error handling for configuration loading and validation.

use thiserror::Error;

/// Configuration-related errors with detailed context
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Layered source could not be read or deserialized
    #[error("Failed to load configuration for environment '{environment}': {source}")]
    Load {
        environment: String,
        #[source]
        source: config::ConfigError,
    },

    /// Invalid configuration value
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigurationError {
    /// Create a load error for the given environment
    pub fn load<E: Into<String>>(environment: E, source: config::ConfigError) -> Self {
        Self::Load {
            environment: environment.into(),
            source,
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<F, V, R>(field: F, value: V, reason: R) -> Self
    where
        F: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigurationError>;
