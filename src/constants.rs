//! # System Constants
//!
//! Failure-domain names and cache key prefixes shared by the orchestrator
//! and the coordinator.

/// Named failure domains tracked independently by the circuit breaker registry
pub mod domains {
    pub const WEATHER: &str = "weather";
    pub const WEARABLE_SYNC: &str = "wearable-sync";
}

/// Cache key prefixes
pub mod cache_keys {
    pub const WEATHER_PREFIX: &str = "weather";
    pub const WEARABLE_SYNC_PREFIX: &str = "wearable-sync";
}

/// Current version of the physiological reading structure
pub const PHYSIOLOGICAL_SCHEMA_VERSION: u8 = 1;
