//! # Context Coordinator
//!
//! Gathers environmental and physiological context for a log entry under
//! strict deadlines. The two acquisition paths run concurrently and each
//! degrades to absence on its own; the caller always gets an
//! [`EntryContext`], never an error.
//!
//! ## Environmental path
//!
//! 1. Device location, bounded by the location deadline.
//! 2. Weather for the rounded coordinates through the resilient fetcher,
//!    bounded by the weather deadline.
//!
//! ## Physiological path
//!
//! 1. First connected wearable; none connected means no reading.
//! 2. A local reading inside the freshness window is used as-is.
//! 3. Otherwise a sync runs through the resilient fetcher with a
//!    platform-dependent deadline, and whatever local reading exists
//!    afterwards is returned.
//!
//! The physiological path as a whole is bounded separately.

use crate::config::ContextConfig;
use crate::constants::{cache_keys, domains};
use crate::models::{
    Coordinates, EntryContext, EnvPayload, EnvironmentalContext, PhysiologicalReading,
};
use crate::orchestration::ResilientFetcher;
use crate::providers::{LocationProvider, WeatherProvider, WearableProvider};
use crate::resilience::with_timeout;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Entry point for enriching a log entry with ambient context
#[derive(Clone)]
pub struct ContextCoordinator {
    fetcher: ResilientFetcher,
    location: Arc<dyn LocationProvider>,
    weather: Arc<dyn WeatherProvider>,
    wearables: Arc<dyn WearableProvider>,
    config: Arc<ContextConfig>,
}

impl std::fmt::Debug for ContextCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextCoordinator")
            .field("fetcher", &self.fetcher)
            .field("platform", &self.config.platform)
            .finish_non_exhaustive()
    }
}

impl ContextCoordinator {
    pub fn new(
        fetcher: ResilientFetcher,
        location: Arc<dyn LocationProvider>,
        weather: Arc<dyn WeatherProvider>,
        wearables: Arc<dyn WearableProvider>,
        config: &ContextConfig,
    ) -> Self {
        Self {
            fetcher,
            location,
            weather,
            wearables,
            config: Arc::new(config.clone()),
        }
    }

    pub fn fetcher(&self) -> &ResilientFetcher {
        &self.fetcher
    }

    /// Acquire best-effort context for one logging action
    #[instrument(skip_all)]
    pub async fn get_entry_context(&self) -> EntryContext {
        let started = Instant::now();

        let (environmental, physiological) =
            futures::future::join(self.environmental_path(), self.physiological_path()).await;

        let context = EntryContext::merge(environmental, physiological);
        info!(
            has_environmental = context.environmental_data.is_some(),
            has_physiological = context.physiological_data.is_some(),
            has_location = context.latitude.is_some(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Entry context acquired"
        );
        context
    }

    async fn environmental_path(&self) -> EnvironmentalContext {
        let location = Arc::clone(&self.location);
        let coordinates = with_timeout("location", self.config.timeouts.location(), async move {
            location.current_location().await
        })
        .await
        .flatten();

        let Some(coordinates) = coordinates else {
            debug!("No location available, skipping weather");
            return EnvironmentalContext::default();
        };

        let payload = self.weather_for(coordinates).await;
        EnvironmentalContext {
            location: Some(coordinates),
            payload,
        }
    }

    async fn weather_for(&self, coordinates: Coordinates) -> Option<EnvPayload> {
        let key = weather_cache_key(coordinates, self.config.weather.coordinate_precision);
        let ttl = self.config.cache.weather_ttl();
        let fetcher = self.fetcher.clone();
        let weather = Arc::clone(&self.weather);

        with_timeout("weather", self.config.timeouts.weather(), async move {
            fetcher
                .cached_fetch(&key, ttl, Some(domains::WEATHER), || {
                    weather.fetch_weather(coordinates.latitude, coordinates.longitude)
                })
                .await
        })
        .await
        .flatten()
    }

    async fn physiological_path(&self) -> Option<PhysiologicalReading> {
        let fetcher = self.fetcher.clone();
        let wearables = Arc::clone(&self.wearables);
        let config = Arc::clone(&self.config);

        with_timeout(
            "physiological",
            self.config.timeouts.physiological_path(),
            acquire_physiological(fetcher, wearables, config),
        )
        .await
        .flatten()
    }
}

async fn acquire_physiological(
    fetcher: ResilientFetcher,
    wearables: Arc<dyn WearableProvider>,
    config: Arc<ContextConfig>,
) -> Option<PhysiologicalReading> {
    let Some(kind) = wearables.first_connected().await else {
        debug!("No wearable connected");
        return None;
    };

    if let Some(reading) = wearables.latest_reading().await {
        if reading.is_fresh(config.cache.physiological_freshness()) {
            debug!(wearable = %kind, "Using fresh local reading");
            return Some(reading);
        }
    }

    let key = format!("{}:{}", cache_keys::WEARABLE_SYNC_PREFIX, kind);
    let ttl = config.cache.wearable_sync_ttl();
    let sync_limit = config.timeouts.wearable_sync(config.platform);
    let sync_wearables = Arc::clone(&wearables);

    let synced = with_timeout("wearable_sync", sync_limit, async move {
        fetcher
            .cached_fetch(&key, ttl, Some(domains::WEARABLE_SYNC), || sync_wearables.sync(kind))
            .await
    })
    .await
    .flatten();

    if synced.is_none() {
        debug!(wearable = %kind, "Sync unavailable, falling back to local reading");
    }

    wearables.latest_reading().await
}

/// Cache key for weather at `coordinates` rounded to `precision` decimals
pub fn weather_cache_key(coordinates: Coordinates, precision: usize) -> String {
    format!(
        "{}:{}",
        cache_keys::WEATHER_PREFIX,
        coordinates.rounded_key(precision)
    )
}
