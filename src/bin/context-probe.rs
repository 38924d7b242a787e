//! # Context Probe
//!
//! Command-line tool that runs the enrichment path once (or a few times)
//! against the live Open-Meteo API and prints the resulting entry context
//! together with circuit breaker metrics.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use flare_context::config::{ConfigManager, PlatformProfile};
use flare_context::logging::init_structured_logging;
use flare_context::models::{PhysiologicalReading, WearableKind};
use flare_context::orchestration::{ContextCoordinator, ResilientFetcher};
use flare_context::providers::{
    FixedLocationProvider, InMemoryWearableHub, OpenMeteoWeatherProvider,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "context-probe")]
#[command(about = "Acquire entry context the way the logging flow does")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Latitude of the simulated device (omit to simulate denied permission)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the simulated device
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Connect a simulated wearable (oura, whoop, fitbit, garmin, apple_health, google_fit)
    #[arg(long, value_parser = parse_wearable)]
    wearable: Option<WearableKind>,

    /// Configuration directory (default: ./config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to apply (default: detected from FLARE_ENV / APP_ENV)
    #[arg(short, long)]
    environment: Option<String>,

    /// Override the configured platform profile (constrained, standard)
    #[arg(long, value_parser = parse_platform)]
    platform: Option<PlatformProfile>,

    /// Number of consecutive entries to enrich (later ones hit the cache)
    #[arg(short = 'n', long, default_value_t = 1)]
    entries: u32,
}

fn parse_wearable(value: &str) -> Result<WearableKind, String> {
    serde_json::from_value(json!(value)).map_err(|_| format!("unknown wearable: {value}"))
}

fn parse_platform(value: &str) -> Result<PlatformProfile, String> {
    serde_json::from_value(json!(value)).map_err(|_| format!("unknown platform: {value}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let manager = match &cli.environment {
        Some(environment) => {
            ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), environment)
        }
        None => ConfigManager::load_from_directory(cli.config_dir.clone()),
    }
    .context("failed to load configuration")?;

    let mut config = manager.config().clone();
    if let Some(platform) = cli.platform {
        config.platform = platform;
    }

    let location = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => FixedLocationProvider::at(lat, lon),
        _ => FixedLocationProvider::denied(),
    };

    let weather = OpenMeteoWeatherProvider::new(&config.weather)
        .context("failed to build weather provider")?;

    let hub = InMemoryWearableHub::new().with_source(Arc::new(simulated_reading));
    if let Some(kind) = cli.wearable {
        hub.connect(kind);
    }

    let coordinator = ContextCoordinator::new(
        ResilientFetcher::from_config(&config),
        Arc::new(location),
        Arc::new(weather),
        Arc::new(hub),
        &config,
    );

    info!(
        environment = manager.environment(),
        entries = cli.entries,
        "Probing entry context"
    );

    let mut contexts = Vec::with_capacity(cli.entries as usize);
    for _ in 0..cli.entries.max(1) {
        contexts.push(coordinator.get_entry_context().await);
    }

    let metrics = coordinator.fetcher().breakers().metrics();
    for domain in metrics.domains.values() {
        info!("{}", domain.format_summary());
    }

    let report = json!({
        "entries": contexts,
        "circuits": metrics,
        "cachedKeys": coordinator.fetcher().cache().len(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn simulated_reading(
    kind: WearableKind,
) -> Result<PhysiologicalReading, flare_context::ProviderError> {
    let mut reading = PhysiologicalReading::new(kind, Utc::now());
    reading.heart_rate_bpm = Some(64.0);
    reading.resting_heart_rate_bpm = Some(56.0);
    reading.hrv_ms = Some(48.0);
    reading.sleep_hours = Some(7.2);
    reading.spo2_percent = Some(97.0);
    Ok(reading)
}
