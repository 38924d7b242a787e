//! In-process TTL cache
//!
//! Holds the last successful result of a keyed fetch for a bounded lifetime.
//! Storage, concurrency and capacity eviction are handled by Moka; each entry
//! carries its own lifetime through an [`Expiry`] policy.
//!
//! Every read also checks `expires_at` against the tokio clock, so an entry is
//! never served past its deadline even before Moka's own sweep removes it.
//!
//! Values are stored as `serde_json::Value` so a single cache instance can
//! serve payloads of different types (weather, sync markers, readings).

use moka::sync::Cache;
use moka::Expiry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default bound on the number of cached keys
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// A stored value and the monotonic instant it stops being valid.
///
/// `expires_at` is `None` when the lifetime does not fit the clock; such an
/// entry lives until it is replaced, invalidated or evicted for capacity.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub expires_at: Option<Instant>,
    ttl: Duration,
}

impl CacheEntry {
    fn is_live_at(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// Hands each entry's own lifetime to Moka
struct PerEntryTtl;

impl PerEntryTtl {
    fn lifetime(entry: &CacheEntry) -> Option<Duration> {
        entry.expires_at.map(|_| entry.ttl)
    }
}

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Self::lifetime(value)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Self::lifetime(value)
    }
}

/// Keyed TTL cache, safe for concurrent use
#[derive(Clone)]
pub struct TtlCache {
    entries: Cache<String, CacheEntry>,
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("max_capacity", &self.entries.policy().max_capacity())
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `max_entries` keys
    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        debug!(max_entries = max_entries, "TTL cache created");
        Self { entries }
    }

    /// Get a live value, decoding it as `T`
    ///
    /// Returns `None` on a miss, on an expired entry (which is evicted), and on
    /// a stored value that does not decode as `T` (also evicted).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Instant::now())
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    pub(crate) fn get_at<T: DeserializeOwned>(&self, key: &str, now: Instant) -> Option<T> {
        let Some(entry) = self.entries.get(key) else {
            debug!(key = key, "Cache MISS");
            return None;
        };

        if !entry.is_live_at(now) {
            self.entries.invalidate(key);
            debug!(key = key, "Cache EXPIRED");
            return None;
        }

        match serde_json::from_value(entry.value) {
            Ok(decoded) => {
                debug!(key = key, "Cache HIT");
                Some(decoded)
            }
            Err(e) => {
                warn!(key = key, error = %e, "Cached value has unexpected shape, evicting");
                self.invalidate(key);
                None
            }
        }
    }

    pub(crate) fn set_at<T: Serialize>(&self, key: &str, value: &T, ttl: Duration, now: Instant) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Value not cacheable, skipping SET");
                return;
            }
        };

        let expires_at = now.checked_add(ttl);
        if expires_at.is_none() {
            warn!(key = key, ttl_secs = ttl.as_secs(), "TTL exceeds clock range, entry will not expire");
        }

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at,
                ttl,
            },
        );
        debug!(key = key, ttl_ms = ttl.as_millis() as u64, "Cache SET");
    }

    /// Remove a single key
    pub fn invalidate(&self, key: &str) {
        self.entries.invalidate(key);
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of stored entries, including ones that have expired but not yet been read
    pub fn len(&self) -> usize {
        self.entries.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_live_at(now))
            .map(|(key, _)| key)
            .collect();

        for key in &expired {
            self.entries.invalidate(key.as_str());
        }
        expired.len()
    }
}
