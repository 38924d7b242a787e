//! # Error Types
//!
//! Errors raised by external collaborators and by fallible setup paths.
//! Nothing on the enrichment path crosses the coordinator boundary as an
//! error; these types exist so retry and circuit logic can see failures.

use crate::config::ConfigurationError;
use thiserror::Error;

/// Failure reported by an external data provider (location, weather, wearable)
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider could not be reached or returned no usable data
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Transport or status-code failure from an HTTP provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response arrived but could not be interpreted
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Wearable integration is not linked
    #[error("Wearable not connected: {0}")]
    NotConnected(String),
}

/// Crate-level error for setup APIs (configuration, provider construction)
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, ContextError>;
