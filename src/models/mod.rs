//! # Models
//!
//! Typed payloads flowing through the enrichment path and the
//! [`EntryContext`] handed back to the logging use case.

pub mod entry_context;
pub mod environment;
pub mod location;
pub mod physiological;

pub use entry_context::EntryContext;
pub(crate) use entry_context::EnvironmentalContext;
pub use environment::{AirQuality, EnvPayload, LocationInfo, WeatherConditions};
pub use location::Coordinates;
pub use physiological::{PhysiologicalReading, WearableConnection, WearableKind};
