//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles environment detection,
//! file discovery and layering via the `config` crate.

use super::error::{ConfigResult, ConfigurationError};
use super::ContextConfig;
use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Base name of configuration files inside the config directory
const CONFIG_FILE_STEM: &str = "context";

/// Prefix for environment variable overrides (`FLARE__RETRY__MAX_RETRIES`)
const ENV_PREFIX: &str = "FLARE";

/// Loaded, validated configuration together with where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: ContextConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection from `./config`
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            environment = environment,
            config_directory = %config_directory.display(),
            "Loading context configuration"
        );

        let config = Self::build_layered(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = environment,
            platform = ?config.platform,
            circuit_breakers_enabled = config.circuit_breakers.enabled,
            max_retries = config.retry.max_retries,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already-built configuration (tests, embedding applications)
    pub fn from_config(config: ContextConfig) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: detect_environment(),
            config_directory: PathBuf::from("config"),
        }))
    }

    fn build_layered(config_directory: &Path, environment: &str) -> ConfigResult<ContextConfig> {
        let base = config_directory.join(CONFIG_FILE_STEM);
        let overlay = config_directory.join(format!("{CONFIG_FILE_STEM}.{environment}"));

        Config::builder()
            .add_source(File::with_name(&base.to_string_lossy()).required(false))
            .add_source(File::with_name(&overlay.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|layered| layered.try_deserialize::<ContextConfig>())
            .map_err(|e| ConfigurationError::load(environment, e))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the configuration directory
    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }
}

/// Detect current environment from environment variables
pub(crate) fn detect_environment() -> String {
    env::var("FLARE_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}
