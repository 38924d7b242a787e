#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Flare Context
//!
//! Best-effort context enrichment for journal entries.
//!
//! ## Overview
//!
//! When a user logs an entry, the application attaches whatever ambient
//! context it can gather quickly: current weather for the device location
//! and the latest physiological reading from a connected wearable. The
//! logging action must never wait long or fail because of this, so every
//! external read is cached, retried with backoff, guarded by a per-domain
//! circuit breaker and bounded by a deadline.
//!
//! ## Module Organization
//!
//! - [`cache`] - In-memory TTL cache shared by all fetches
//! - [`resilience`] - Circuit breakers, retry with backoff, deadlines
//! - [`orchestration`] - Resilient fetcher and the context coordinator
//! - [`providers`] - Location, weather and wearable seams plus implementations
//! - [`models`] - Payload types and the resulting [`EntryContext`]
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flare_context::config::ContextConfig;
//! use flare_context::orchestration::{ContextCoordinator, ResilientFetcher};
//! use flare_context::providers::{
//!     FixedLocationProvider, InMemoryWearableHub, OpenMeteoWeatherProvider,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContextConfig::default();
//! let coordinator = ContextCoordinator::new(
//!     ResilientFetcher::from_config(&config),
//!     Arc::new(FixedLocationProvider::at(37.77, -122.41)),
//!     Arc::new(OpenMeteoWeatherProvider::new(&config.weather)?),
//!     Arc::new(InMemoryWearableHub::new()),
//!     &config,
//! );
//!
//! let context = coordinator.get_entry_context().await;
//! println!("{}", serde_json::to_string_pretty(&context)?);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod providers;
pub mod resilience;

pub use cache::TtlCache;
pub use config::{ConfigManager, ContextConfig, PlatformProfile};
pub use error::{ContextError, ProviderError, Result};
pub use models::{
    Coordinates, EntryContext, EnvPayload, PhysiologicalReading, WearableConnection, WearableKind,
};
pub use orchestration::{ContextCoordinator, ResilientFetcher};
pub use resilience::{
    with_retry, with_timeout, CircuitBreakerRegistry, CircuitStatus, RetryError, RetryPolicy,
};
