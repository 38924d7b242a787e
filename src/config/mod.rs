//! # Context Acquisition Configuration
//!
//! Layered configuration for the enrichment subsystem. Every section carries
//! defaults, so an empty (or absent) configuration directory yields a
//! working setup.
//!
//! ## Sources (later wins)
//!
//! - Built-in defaults
//! - `{config_dir}/context.yaml`
//! - `{config_dir}/context.{environment}.yaml`
//! - Environment variables `FLARE__SECTION__KEY` (e.g. `FLARE__RETRY__MAX_RETRIES=3`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flare_context::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let weather_ttl = manager.config().cache.weather_ttl();
//! let budget = manager.config().timeouts.physiological_path();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `context.yaml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    /// TTLs and freshness windows
    pub cache: CacheConfig,

    /// Backoff and retry configuration
    pub retry: RetryConfig,

    /// Circuit breaker configuration per failure domain
    pub circuit_breakers: CircuitBreakerConfig,

    /// Per-step deadlines of the coordinator
    pub timeouts: TimeoutConfig,

    /// Device class the process runs on
    pub platform: PlatformProfile,

    /// HTTP weather provider settings
    pub weather: WeatherProviderConfig,
}

/// Cache lifetimes for fetched data
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub weather_ttl_seconds: u64,
    pub wearable_sync_ttl_seconds: u64,
    /// A local wearable reading younger than this is used without syncing
    pub physiological_freshness_seconds: u64,
    /// Upper bound on cached keys before capacity eviction
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_seconds: 300,
            wearable_sync_ttl_seconds: 300,
            physiological_freshness_seconds: 300,
            max_entries: crate::cache::ttl_cache::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    pub fn weather_ttl(&self) -> Duration {
        Duration::from_secs(self.weather_ttl_seconds)
    }

    pub fn wearable_sync_ttl(&self) -> Duration {
        Duration::from_secs(self.wearable_sync_ttl_seconds)
    }

    pub fn physiological_freshness(&self) -> Duration {
        Duration::from_secs(self.physiological_freshness_seconds)
    }
}

/// Retry settings applied by the resilient fetcher
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 300,
            max_delay_ms: 5_000,
        }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Circuit breaker configuration integrated with YAML config
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// When false, circuits never reject calls (outcomes are still recorded)
    pub enabled: bool,

    /// Default configuration for domains without an explicit entry
    pub default_config: CircuitBreakerComponentConfig,

    /// Specific configurations keyed by failure-domain name
    pub component_configs: HashMap<String, CircuitBreakerComponentConfig>,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_config: CircuitBreakerComponentConfig::default(),
            component_configs: HashMap::new(),
        }
    }
}

/// Circuit breaker configuration for a specific failure domain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerComponentConfig {
    /// Number of consecutive failures before opening circuit
    pub failure_threshold: u32,

    /// Time an open circuit rejects calls before admitting the next attempt
    pub cooldown_seconds: u64,
}

impl Default for CircuitBreakerComponentConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_seconds: 60,
        }
    }
}

impl CircuitBreakerConfig {
    /// Get configuration for a specific domain
    pub fn config_for_domain(&self, domain: &str) -> CircuitBreakerComponentConfig {
        self.component_configs
            .get(domain)
            .cloned()
            .unwrap_or_else(|| self.default_config.clone())
    }
}

impl CircuitBreakerComponentConfig {
    /// Convert to resilience module's format
    pub fn to_resilience_config(&self) -> crate::resilience::config::CircuitBreakerConfig {
        crate::resilience::config::CircuitBreakerConfig {
            failure_threshold: self.failure_threshold,
            cooldown: Duration::from_secs(self.cooldown_seconds),
        }
    }
}

/// Deadlines for each externally-facing step of the coordinator
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub location_ms: u64,
    pub weather_ms: u64,
    pub wearable_sync_constrained_ms: u64,
    pub wearable_sync_standard_ms: u64,
    /// Bound on the whole physiological path
    pub physiological_path_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            location_ms: 2_500,
            weather_ms: 3_500,
            wearable_sync_constrained_ms: 10_000,
            wearable_sync_standard_ms: 5_000,
            physiological_path_ms: 8_000,
        }
    }
}

impl TimeoutConfig {
    pub fn location(&self) -> Duration {
        Duration::from_millis(self.location_ms)
    }

    pub fn weather(&self) -> Duration {
        Duration::from_millis(self.weather_ms)
    }

    pub fn physiological_path(&self) -> Duration {
        Duration::from_millis(self.physiological_path_ms)
    }

    /// Sync deadline for the given platform class
    pub fn wearable_sync(&self, platform: PlatformProfile) -> Duration {
        match platform {
            PlatformProfile::Constrained => Duration::from_millis(self.wearable_sync_constrained_ms),
            PlatformProfile::Standard => Duration::from_millis(self.wearable_sync_standard_ms),
        }
    }
}

/// Device class; resource-constrained platforms get a longer sync budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformProfile {
    Constrained,
    #[default]
    Standard,
}

/// Settings for the Open-Meteo weather provider
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherProviderConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    /// Decimal places kept when building weather cache keys
    pub coordinate_precision: usize,
}

impl Default for WeatherProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            request_timeout_ms: 3_000,
            coordinate_precision: 2,
        }
    }
}

impl WeatherProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl ContextConfig {
    /// Test-optimized configuration with short budgets
    pub fn for_test() -> Self {
        Self {
            retry: RetryConfig {
                max_retries: 2,
                base_delay_ms: 10,
                max_delay_ms: 100,
            },
            timeouts: TimeoutConfig {
                location_ms: 250,
                weather_ms: 350,
                wearable_sync_constrained_ms: 1_000,
                wearable_sync_standard_ms: 500,
                physiological_path_ms: 800,
            },
            ..Self::default()
        }
    }

    /// Validate the loaded configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let non_zero = [
            ("cache.weather_ttl_seconds", self.cache.weather_ttl_seconds),
            (
                "cache.wearable_sync_ttl_seconds",
                self.cache.wearable_sync_ttl_seconds,
            ),
            (
                "cache.physiological_freshness_seconds",
                self.cache.physiological_freshness_seconds,
            ),
            ("cache.max_entries", self.cache.max_entries),
            ("retry.base_delay_ms", self.retry.base_delay_ms),
            ("timeouts.location_ms", self.timeouts.location_ms),
            ("timeouts.weather_ms", self.timeouts.weather_ms),
            (
                "timeouts.wearable_sync_constrained_ms",
                self.timeouts.wearable_sync_constrained_ms,
            ),
            (
                "timeouts.wearable_sync_standard_ms",
                self.timeouts.wearable_sync_standard_ms,
            ),
            (
                "timeouts.physiological_path_ms",
                self.timeouts.physiological_path_ms,
            ),
            ("weather.request_timeout_ms", self.weather.request_timeout_ms),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    "0",
                    "must be greater than 0",
                ));
            }
        }

        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigurationError::invalid_value(
                "retry.max_delay_ms",
                self.retry.max_delay_ms.to_string(),
                format!(
                    "must be at least base_delay_ms ({})",
                    self.retry.base_delay_ms
                ),
            ));
        }

        if self.weather.coordinate_precision > 6 {
            return Err(ConfigurationError::invalid_value(
                "weather.coordinate_precision",
                self.weather.coordinate_precision.to_string(),
                "should not exceed 6 decimal places",
            ));
        }

        let breakers = std::iter::once((
            "default".to_string(),
            &self.circuit_breakers.default_config,
        ))
        .chain(
            self.circuit_breakers
                .component_configs
                .iter()
                .map(|(name, cfg)| (name.clone(), cfg)),
        );
        for (name, cfg) in breakers {
            cfg.to_resilience_config().validate().map_err(|reason| {
                ConfigurationError::invalid_value(
                    format!("circuit_breakers.{name}"),
                    format!("{cfg:?}"),
                    reason,
                )
            })?;
        }

        Ok(())
    }
}
