//! # Orchestration
//!
//! The enrichment path proper: the resilient fetcher that every external
//! read goes through, and the coordinator that runs both acquisition paths
//! under their deadlines.

pub mod context_coordinator;
pub mod resilient_fetch;

pub use context_coordinator::{weather_cache_key, ContextCoordinator};
pub use resilient_fetch::ResilientFetcher;
