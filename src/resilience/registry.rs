//! # Circuit Breaker Registry
//!
//! Holds one circuit per named failure domain ("weather", "wearable-sync", ...).
//! Circuits are created lazily on first use and live as long as the registry.
//! The registry never raises; it answers state queries and records outcomes
//! reported by the retry policy.

use crate::config::CircuitBreakerConfig as CircuitBreakerSettings;
use crate::resilience::{
    CircuitBreakerConfig, CircuitState, DomainCircuitMetrics, SystemCircuitMetrics,
};
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug)]
struct DomainCircuit {
    state: CircuitState,
    config: CircuitBreakerConfig,
    success_count: u64,
    failure_count: u64,
    rejected_count: u64,
    times_opened: u64,
}

impl DomainCircuit {
    fn metrics(&self) -> DomainCircuitMetrics {
        DomainCircuitMetrics {
            domain: self.state.domain.clone(),
            status: self.state.status(),
            consecutive_failures: self.state.consecutive_failures,
            success_count: self.success_count,
            failure_count: self.failure_count,
            rejected_count: self.rejected_count,
            times_opened: self.times_opened,
        }
    }
}

/// Registry of per-domain circuits, safe for concurrent use
#[derive(Debug)]
pub struct CircuitBreakerRegistry {
    circuits: DashMap<String, DomainCircuit>,
    settings: CircuitBreakerSettings,
}

impl CircuitBreakerRegistry {
    /// Create a registry from file-based circuit settings
    pub fn new(settings: CircuitBreakerSettings) -> Self {
        info!(
            enabled = settings.enabled,
            failure_threshold = settings.default_config.failure_threshold,
            cooldown_seconds = settings.default_config.cooldown_seconds,
            overrides = settings.component_configs.len(),
            "Circuit breaker registry initialized"
        );

        Self {
            circuits: DashMap::new(),
            settings,
        }
    }

    /// Whether open circuits reject calls
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    fn circuit_mut(&self, domain: &str) -> dashmap::mapref::one::RefMut<'_, String, DomainCircuit> {
        self.circuits
            .entry(domain.to_string())
            .or_insert_with(|| {
                let config = self
                    .settings
                    .config_for_domain(domain)
                    .to_resilience_config();
                debug!(
                    domain = domain,
                    failure_threshold = config.failure_threshold,
                    cooldown_seconds = config.cooldown.as_secs(),
                    "Created circuit for failure domain"
                );
                DomainCircuit {
                    state: CircuitState::new(domain),
                    config,
                    success_count: 0,
                    failure_count: 0,
                    rejected_count: 0,
                    times_opened: 0,
                }
            })
    }

    /// Whether calls to `domain` are currently rejected.
    ///
    /// An open circuit whose cooldown has elapsed is closed here and its
    /// failure count reset, so the next call goes through. Querying does not
    /// count as a rejection; callers that skip work use [`Self::record_rejection`].
    pub fn is_open(&self, domain: &str) -> bool {
        if !self.settings.enabled {
            return false;
        }

        let mut circuit = self.circuit_mut(domain);
        let was_open = circuit.state.is_open;
        let cooldown = circuit.config.cooldown;
        let open = circuit.state.evaluate(cooldown, Instant::now());

        if !open && was_open {
            info!(
                domain = domain,
                cooldown_seconds = cooldown.as_secs(),
                "Circuit cooldown elapsed, admitting next attempt"
            );
        }
        open
    }

    /// Record a call skipped because the circuit was open
    pub fn record_rejection(&self, domain: &str) {
        self.circuit_mut(domain).rejected_count += 1;
    }

    /// Record a successful call; closes the circuit and clears the failure count
    pub fn record_success(&self, domain: &str) {
        let mut circuit = self.circuit_mut(domain);
        circuit.success_count += 1;
        if circuit.state.consecutive_failures > 0 || circuit.state.is_open {
            debug!(
                domain = domain,
                previous_failures = circuit.state.consecutive_failures,
                "Circuit recovered"
            );
        }
        circuit.state.on_success();
    }

    /// Record a failed call; opens the circuit once the threshold is reached
    pub fn record_failure(&self, domain: &str) {
        let enabled = self.settings.enabled;
        let mut circuit = self.circuit_mut(domain);
        circuit.failure_count += 1;

        let threshold = circuit.config.failure_threshold;
        if circuit.state.on_failure(threshold, Instant::now(), enabled) {
            circuit.times_opened += 1;
            error!(
                domain = domain,
                consecutive_failures = circuit.state.consecutive_failures,
                failure_threshold = threshold,
                cooldown_seconds = circuit.config.cooldown.as_secs(),
                "Circuit breaker opened (failing fast)"
            );
        } else {
            debug!(
                domain = domain,
                consecutive_failures = circuit.state.consecutive_failures,
                failure_threshold = threshold,
                "Failure recorded"
            );
        }
    }

    /// Snapshot of a domain's state, if the domain has been used
    pub fn state(&self, domain: &str) -> Option<CircuitState> {
        self.circuits.get(domain).map(|c| c.state.clone())
    }

    /// Names of all domains seen so far
    pub fn domains(&self) -> Vec<String> {
        self.circuits.iter().map(|c| c.key().clone()).collect()
    }

    /// Forget a domain's history; the next use starts closed
    pub fn reset(&self, domain: &str) -> bool {
        let removed = self.circuits.remove(domain).is_some();
        if removed {
            info!(domain = domain, "Circuit reset");
        }
        removed
    }

    /// Get system-wide circuit metrics
    pub fn metrics(&self) -> SystemCircuitMetrics {
        let mut system = SystemCircuitMetrics::new();
        for circuit in self.circuits.iter() {
            system.add_domain(circuit.metrics());
        }
        system
    }
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new(CircuitBreakerSettings::default())
    }
}
