//! Shared mocks for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use flare_context::config::ContextConfig;
use flare_context::models::{
    Coordinates, EnvPayload, LocationInfo, PhysiologicalReading, WearableConnection, WearableKind,
};
use flare_context::orchestration::{ContextCoordinator, ResilientFetcher};
use flare_context::providers::{LocationProvider, WeatherProvider, WearableProvider};
use flare_context::ProviderError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("flare_context=debug")
        .with_test_writer()
        .try_init();
}

/// Location provider with an optional artificial delay
pub struct MockLocation {
    pub coordinates: Option<Coordinates>,
    pub delay: Duration,
}

impl MockLocation {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Some(Coordinates::new(latitude, longitude)),
            delay: Duration::ZERO,
        }
    }

    pub fn denied() -> Self {
        Self {
            coordinates: None,
            delay: Duration::ZERO,
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl LocationProvider for MockLocation {
    async fn current_location(&self) -> Option<Coordinates> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.coordinates
    }
}

pub enum WeatherBehavior {
    Succeed(EnvPayload),
    Fail,
    Hang,
}

/// Weather provider that records every call
pub struct MockWeather {
    behavior: WeatherBehavior,
    calls: AtomicU32,
    last_query: Mutex<Option<(f64, f64)>>,
}

impl MockWeather {
    pub fn new(behavior: WeatherBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicU32::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<(f64, f64)> {
        *self.last_query.lock()
    }
}

#[async_trait]
impl WeatherProvider for MockWeather {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<EnvPayload, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock() = Some((latitude, longitude));

        match &self.behavior {
            WeatherBehavior::Succeed(payload) => Ok(payload.clone()),
            WeatherBehavior::Fail => Err(ProviderError::Unavailable("weather service down".into())),
            WeatherBehavior::Hang => std::future::pending().await,
        }
    }
}

pub enum SyncBehavior {
    /// Store a reading recorded "now"
    Refresh,
    Fail,
    Hang,
}

/// Wearable provider with a scripted sync
pub struct MockWearables {
    connections: Vec<WearableConnection>,
    latest: Mutex<Option<PhysiologicalReading>>,
    sync_behavior: SyncBehavior,
    sync_calls: AtomicU32,
    last_sync_at: Mutex<Option<Instant>>,
}

impl MockWearables {
    pub fn none() -> Self {
        Self::new(Vec::new(), SyncBehavior::Fail)
    }

    pub fn connected(kind: WearableKind, sync_behavior: SyncBehavior) -> Self {
        Self::new(
            vec![WearableConnection {
                kind,
                connected: true,
            }],
            sync_behavior,
        )
    }

    pub fn new(connections: Vec<WearableConnection>, sync_behavior: SyncBehavior) -> Self {
        Self {
            connections,
            latest: Mutex::new(None),
            sync_behavior,
            sync_calls: AtomicU32::new(0),
            last_sync_at: Mutex::new(None),
        }
    }

    pub fn with_reading(self, reading: PhysiologicalReading) -> Self {
        *self.latest.lock() = Some(reading);
        self
    }

    pub fn sync_calls(&self) -> u32 {
        self.sync_calls.load(Ordering::SeqCst)
    }

    /// When the most recent sync began, on the tokio clock
    pub fn last_sync_at(&self) -> Option<Instant> {
        *self.last_sync_at.lock()
    }
}

#[async_trait]
impl WearableProvider for MockWearables {
    async fn connections(&self) -> Vec<WearableConnection> {
        self.connections.clone()
    }

    async fn sync(&self, kind: WearableKind) -> Result<(), ProviderError> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_sync_at.lock() = Some(Instant::now());
        match self.sync_behavior {
            SyncBehavior::Refresh => {
                let mut reading = PhysiologicalReading::new(kind, chrono::Utc::now());
                reading.heart_rate_bpm = Some(60.0);
                *self.latest.lock() = Some(reading);
                Ok(())
            }
            SyncBehavior::Fail => Err(ProviderError::Unavailable("device cloud down".into())),
            SyncBehavior::Hang => std::future::pending().await,
        }
    }

    async fn latest_reading(&self) -> Option<PhysiologicalReading> {
        self.latest.lock().clone()
    }
}

pub fn cloudy_in(city: &str) -> EnvPayload {
    let mut payload = EnvPayload::with_condition("Cloudy");
    payload.weather.temperature_c = Some(14.0);
    payload.location = Some(LocationInfo {
        city: Some(city.to_string()),
        ..LocationInfo::default()
    });
    payload
}

pub fn build_coordinator(
    config: &ContextConfig,
    location: MockLocation,
    weather: Arc<MockWeather>,
    wearables: Arc<MockWearables>,
) -> ContextCoordinator {
    ContextCoordinator::new(
        ResilientFetcher::from_config(config),
        Arc::new(location),
        weather,
        wearables,
        config,
    )
}
