//! # Cache Module
//!
//! Short-lived, process-local caching of fetched context data, used to avoid
//! redundant calls to slow or rate-limited providers.

pub mod ttl_cache;

pub use ttl_cache::{CacheEntry, TtlCache};
