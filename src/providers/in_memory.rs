//! In-process providers for the probe binary and tests

use super::{LocationProvider, WearableProvider};
use crate::error::ProviderError;
use crate::models::{Coordinates, PhysiologicalReading, WearableConnection, WearableKind};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Location provider returning a configured coordinate.
///
/// `None` behaves like a device where location permission was denied.
#[derive(Debug, Clone, Default)]
pub struct FixedLocationProvider {
    coordinates: Option<Coordinates>,
}

impl FixedLocationProvider {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(Some(Coordinates::new(latitude, longitude)))
    }

    pub fn denied() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> Option<Coordinates> {
        self.coordinates
    }
}

/// Produces a reading when a sync runs
pub type SyncSource =
    Arc<dyn Fn(WearableKind) -> Result<PhysiologicalReading, ProviderError> + Send + Sync>;

/// Wearable hub backed by process memory.
///
/// Holds the connection registry and the latest reading. A sync calls the
/// configured source and stores what it yields.
#[derive(Clone, Default)]
pub struct InMemoryWearableHub {
    connections: Arc<RwLock<Vec<WearableConnection>>>,
    latest: Arc<RwLock<Option<PhysiologicalReading>>>,
    source: Option<SyncSource>,
}

impl std::fmt::Debug for InMemoryWearableHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryWearableHub")
            .field("connections", &*self.connections.read())
            .field("has_reading", &self.latest.read().is_some())
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl InMemoryWearableHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: SyncSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn connect(&self, kind: WearableKind) {
        let mut connections = self.connections.write();
        match connections.iter_mut().find(|c| c.kind == kind) {
            Some(existing) => existing.connected = true,
            None => connections.push(WearableConnection {
                kind,
                connected: true,
            }),
        }
    }

    pub fn disconnect(&self, kind: WearableKind) {
        if let Some(existing) = self.connections.write().iter_mut().find(|c| c.kind == kind) {
            existing.connected = false;
        }
    }

    pub fn store_reading(&self, reading: PhysiologicalReading) {
        *self.latest.write() = Some(reading);
    }

    fn is_connected(&self, kind: WearableKind) -> bool {
        self.connections
            .read()
            .iter()
            .any(|c| c.kind == kind && c.connected)
    }
}

#[async_trait]
impl WearableProvider for InMemoryWearableHub {
    async fn connections(&self) -> Vec<WearableConnection> {
        self.connections.read().clone()
    }

    async fn sync(&self, kind: WearableKind) -> Result<(), ProviderError> {
        if !self.is_connected(kind) {
            return Err(ProviderError::NotConnected(kind.to_string()));
        }

        let source = self
            .source
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable(format!("no sync source for {kind}")))?;

        let reading = source(kind)?;
        debug!(wearable = %kind, recorded_at = %reading.recorded_at, "Stored synced reading");
        self.store_reading(reading);
        Ok(())
    }

    async fn latest_reading(&self) -> Option<PhysiologicalReading> {
        self.latest.read().clone()
    }
}
