//! # External Providers
//!
//! Seams between the enrichment path and the outside world. The coordinator
//! only ever sees these traits; concrete platform integrations plug in behind
//! them.
//!
//! Location lookups and wearable reads never fail loudly: absence is the
//! only failure signal they have. Weather fetches and wearable syncs return
//! errors so that retry and circuit breaking can observe them; the
//! orchestrator turns those errors back into absence.

pub mod in_memory;
pub mod open_meteo;

pub use in_memory::{FixedLocationProvider, InMemoryWearableHub};
pub use open_meteo::OpenMeteoWeatherProvider;

use crate::error::ProviderError;
use crate::models::{
    Coordinates, EnvPayload, PhysiologicalReading, WearableConnection, WearableKind,
};
use async_trait::async_trait;

/// Device location lookup
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current coordinates, or `None` when permission is denied or no fix is available
    async fn current_location(&self) -> Option<Coordinates>;
}

/// Environmental data source keyed by coordinates
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_weather(&self, latitude: f64, longitude: f64)
        -> Result<EnvPayload, ProviderError>;
}

/// Wearable connection registry and local reading store
#[async_trait]
pub trait WearableProvider: Send + Sync {
    /// Registered integrations in preference order
    async fn connections(&self) -> Vec<WearableConnection>;

    /// Pull fresh data from the device service into the local store
    async fn sync(&self, kind: WearableKind) -> Result<(), ProviderError>;

    /// Most recent locally stored reading
    async fn latest_reading(&self) -> Option<PhysiologicalReading>;

    /// First connected integration, if any
    async fn first_connected(&self) -> Option<WearableKind> {
        self.connections()
            .await
            .into_iter()
            .find(|connection| connection.connected)
            .map(|connection| connection.kind)
    }
}
