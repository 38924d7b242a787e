//! # Resilience Module
//!
//! Failure-handling primitives for calls to unreliable external providers.
//!
//! ## Architecture
//!
//! - **Circuit Breakers**: one circuit per named failure domain, held by a
//!   [`CircuitBreakerRegistry`]; stops calls to a domain that keeps failing
//!   and admits calls again after a cooldown
//! - **Retry Policy**: bounded retries with exponential backoff and jitter,
//!   reporting outcomes to the registry
//! - **Deadlines**: [`with_timeout`] races an operation against a timer and
//!   abandons it (without blocking the caller) when the timer wins
//! - **Metrics**: per-domain snapshots for health reporting
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flare_context::resilience::{with_retry, CircuitBreakerRegistry, RetryPolicy};
//!
//! # async fn example() {
//! let breakers = CircuitBreakerRegistry::default();
//! let policy = RetryPolicy::default().with_circuit_domain("weather");
//!
//! let result = with_retry(&breakers, &policy, || async {
//!     Ok::<_, String>("Cloudy")
//! })
//! .await;
//! # }
//! ```

pub mod circuit_breaker;
pub mod config;
pub mod metrics;
pub mod registry;
pub mod retry;
pub mod timeout;

pub use circuit_breaker::{CircuitState, CircuitStatus};
pub use config::CircuitBreakerConfig;
pub use metrics::{DomainCircuitMetrics, SystemCircuitMetrics};
pub use registry::CircuitBreakerRegistry;
pub use retry::{with_retry, RetryError, RetryPolicy};
pub use timeout::with_timeout;
