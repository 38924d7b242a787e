//! Configuration loading from a directory of YAML files

use flare_context::config::{ConfigManager, ConfigurationError, PlatformProfile};
use flare_context::orchestration::ResilientFetcher;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_production_overlay_drives_runtime_components() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("context.yaml"),
        r#"
cache:
  weather_ttl_seconds: 600
circuit_breakers:
  default_config:
    failure_threshold: 4
    cooldown_seconds: 30
"#,
    )?;
    fs::write(
        dir.path().join("context.production.yaml"),
        r#"
platform: constrained
retry:
  max_retries: 3
  max_delay_ms: 8000
weather:
  coordinate_precision: 3
"#,
    )?;

    let manager =
        ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "production")?;
    let config = manager.config();

    assert_eq!(manager.environment(), "production");
    assert_eq!(manager.config_directory(), dir.path());
    assert_eq!(config.platform, PlatformProfile::Constrained);
    assert_eq!(config.cache.weather_ttl(), Duration::from_secs(600));
    assert_eq!(
        config.timeouts.wearable_sync(config.platform),
        Duration::from_secs(10)
    );
    assert_eq!(config.weather.coordinate_precision, 3);

    let fetcher = ResilientFetcher::from_config(config);
    assert_eq!(fetcher.retry_policy().max_retries, 3);
    assert_eq!(fetcher.retry_policy().max_delay, Duration::from_secs(8));

    let breakers = fetcher.breakers();
    for _ in 0..3 {
        breakers.record_failure("weather");
    }
    assert!(!breakers.is_open("weather"));
    breakers.record_failure("weather");
    assert!(breakers.is_open("weather"));

    Ok(())
}

#[test]
fn test_out_of_range_breaker_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("context.yaml"),
        r#"
circuit_breakers:
  component_configs:
    wearable-sync:
      failure_threshold: 0
      cooldown_seconds: 60
"#,
    )
    .unwrap();

    let err = ConfigManager::load_from_directory_with_env(Some(dir.path().to_path_buf()), "test")
        .unwrap_err();
    match err {
        ConfigurationError::InvalidValue { field, .. } => {
            assert_eq!(field, "circuit_breakers.wearable-sync");
        }
        other => panic!("unexpected error: {other}"),
    }
}
