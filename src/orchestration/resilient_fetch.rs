//! # Resilient Fetch
//!
//! Composes the TTL cache, circuit breakers and retry policy into a single
//! read-through fetch that never fails: callers get a value or `None`.

use crate::cache::TtlCache;
use crate::config::ContextConfig;
use crate::logging::{log_error, log_fetch_operation};
use crate::resilience::{with_retry, CircuitBreakerRegistry, RetryError, RetryPolicy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Cache-first fetcher guarded by per-domain circuit breakers.
///
/// Cloning is cheap and clones share the same cache and breaker registry,
/// so concurrent acquisition paths observe each other's results.
#[derive(Debug, Clone)]
pub struct ResilientFetcher {
    cache: Arc<TtlCache>,
    breakers: Arc<CircuitBreakerRegistry>,
    retry: RetryPolicy,
}

impl ResilientFetcher {
    pub fn new(cache: Arc<TtlCache>, breakers: Arc<CircuitBreakerRegistry>, retry: RetryPolicy) -> Self {
        Self {
            cache,
            breakers,
            retry,
        }
    }

    /// Fresh cache and registry built from configuration
    pub fn from_config(config: &ContextConfig) -> Self {
        Self::new(
            Arc::new(TtlCache::with_capacity(config.cache.max_entries)),
            Arc::new(CircuitBreakerRegistry::new(config.circuit_breakers.clone())),
            RetryPolicy::from_config(&config.retry),
        )
    }

    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    pub fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Return the cached value for `key`, or fetch, cache for `ttl`, and return it.
    ///
    /// A cache hit skips the breaker entirely. With `circuit_domain` set, an
    /// open circuit short-circuits to `None` without calling `fetcher`. Every
    /// failure (open circuit, exhausted retries) is logged and becomes `None`.
    pub async fn cached_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        circuit_domain: Option<&str>,
        fetcher: F,
    ) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.cache.get::<T>(key) {
            log_fetch_operation("cached_fetch", circuit_domain, key, "cache_hit", None, None);
            return Some(hit);
        }

        let policy = match circuit_domain {
            Some(domain) => self.retry.clone().with_circuit_domain(domain),
            None => RetryPolicy {
                circuit_domain: None,
                ..self.retry.clone()
            },
        };

        let started = Instant::now();
        let outcome = with_retry(&self.breakers, &policy, fetcher).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(value) => {
                self.cache.set(key, &value, ttl);
                log_fetch_operation(
                    "cached_fetch",
                    circuit_domain,
                    key,
                    "fetched",
                    Some(duration_ms),
                    None,
                );
                Some(value)
            }
            Err(RetryError::CircuitOpen { domain }) => {
                warn!(domain = %domain, key = %key, "Circuit open, skipping fetch");
                log_fetch_operation(
                    "cached_fetch",
                    Some(&domain),
                    key,
                    "circuit_open",
                    Some(duration_ms),
                    None,
                );
                None
            }
            Err(err @ RetryError::Exhausted { .. }) => {
                let error = err.to_string();
                log_error("resilient_fetch", "cached_fetch", &error, Some(key));
                log_fetch_operation(
                    "cached_fetch",
                    circuit_domain,
                    key,
                    "failed",
                    Some(duration_ms),
                    Some(&error),
                );
                None
            }
        }
    }
}
