//! # Retry Policy
//!
//! Wraps one async operation with bounded retries, exponential backoff with
//! jitter, and circuit breaker reporting.
//!
//! The delay before retry `n` (zero-based attempt that just failed) is
//! `min(max_delay, base_delay * 2^n + jitter)` with `jitter` drawn uniformly
//! from `[0, base_delay)`. Backoff sleeps suspend only the calling chain.

use crate::config::RetryConfig;
use crate::resilience::CircuitBreakerRegistry;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry bounds and the optional failure domain to consult and report to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub circuit_domain: Option<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(5),
            circuit_domain: None,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.base_delay(),
            max_delay: config.max_delay(),
            circuit_domain: None,
        }
    }

    /// Consult and report to the given failure domain
    pub fn with_circuit_domain(mut self, domain: impl Into<String>) -> Self {
        self.circuit_domain = Some(domain.into());
        self
    }

    /// Delay to wait after failed attempt `attempt` (zero-based), jitter included
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let jitter = self.base_delay.mul_f64(fastrand::f64());
        self.delay_with_jitter(attempt, jitter)
    }

    fn delay_with_jitter(&self, attempt: u32, jitter: Duration) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .saturating_mul(factor)
            .saturating_add(jitter)
            .min(self.max_delay)
    }
}

/// Why a retried operation produced no value
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The failure domain's circuit was open; the operation was not attempted
    #[error("Circuit breaker is open for {domain}")]
    CircuitOpen { domain: String },

    /// Every attempt failed; carries the last underlying error
    #[error("Operation failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },
}

/// Run `operation` under `policy`, retrying failures with backoff.
///
/// With a circuit domain configured, an open circuit fails fast without
/// calling the operation (and without counting a new failure); every failed
/// attempt is reported to the registry, as is the first success.
pub async fn with_retry<T, E, F, Fut>(
    breakers: &CircuitBreakerRegistry,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let domain = policy.circuit_domain.as_deref();

    if let Some(domain) = domain {
        if breakers.is_open(domain) {
            breakers.record_rejection(domain);
            debug!(domain = domain, "Circuit open, skipping operation");
            return Err(RetryError::CircuitOpen {
                domain: domain.to_string(),
            });
        }
    }

    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if let Some(domain) = domain {
                    breakers.record_success(domain);
                }
                if attempt > 0 {
                    debug!(domain = domain, attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if let Some(domain) = domain {
                    breakers.record_failure(domain);
                }

                if attempt >= policy.max_retries {
                    return Err(RetryError::Exhausted {
                        attempts: attempt + 1,
                        last_error: error,
                    });
                }

                let delay = policy.backoff_delay(attempt);
                warn!(
                    domain = domain,
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
