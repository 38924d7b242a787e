//! # Circuit Breaker Metrics
//!
//! Point-in-time snapshots of every failure domain's circuit, for logging and
//! health reporting.

use crate::resilience::CircuitStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Metrics for a single failure domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainCircuitMetrics {
    pub domain: String,
    pub status: CircuitStatus,
    pub consecutive_failures: u32,
    pub success_count: u64,
    pub failure_count: u64,
    /// Calls refused because the circuit was open
    pub rejected_count: u64,
    /// Number of Closed -> Open transitions
    pub times_opened: u64,
}

impl DomainCircuitMetrics {
    /// Failure rate over all recorded outcomes (0.0 to 1.0)
    pub fn failure_rate(&self) -> f64 {
        let total = self.success_count + self.failure_count;
        if total == 0 {
            return 0.0;
        }
        self.failure_count as f64 / total as f64
    }

    /// Get human-readable state description
    pub fn state_description(&self) -> &'static str {
        match self.status {
            CircuitStatus::Closed => "Healthy - Normal operation",
            CircuitStatus::Open => "Failing - Rejecting all calls",
        }
    }

    /// Format metrics for logging
    pub fn format_summary(&self) -> String {
        format!(
            "{}: {} | Successes: {} | Failures: {} ({:.1}%) | Rejected: {}",
            self.domain,
            self.state_description(),
            self.success_count,
            self.failure_count,
            self.failure_rate() * 100.0,
            self.rejected_count
        )
    }
}

/// System-wide circuit metrics aggregator
#[derive(Debug, Clone, Serialize)]
pub struct SystemCircuitMetrics {
    pub domains: HashMap<String, DomainCircuitMetrics>,
    pub collected_at: DateTime<Utc>,
}

impl SystemCircuitMetrics {
    pub fn new() -> Self {
        Self {
            domains: HashMap::new(),
            collected_at: Utc::now(),
        }
    }

    pub fn add_domain(&mut self, metrics: DomainCircuitMetrics) {
        self.domains.insert(metrics.domain.clone(), metrics);
    }

    /// Count of domains per status
    pub fn count_by_status(&self) -> HashMap<CircuitStatus, usize> {
        let mut counts = HashMap::new();
        for metrics in self.domains.values() {
            *counts.entry(metrics.status).or_insert(0) += 1;
        }
        counts
    }

    /// Names of domains currently rejecting calls, sorted
    pub fn open_domains(&self) -> Vec<String> {
        let mut open: Vec<String> = self
            .domains
            .values()
            .filter(|m| m.status == CircuitStatus::Open)
            .map(|m| m.domain.clone())
            .collect();
        open.sort();
        open
    }

    /// Fraction of closed circuits (1.0 when no domain has been used)
    pub fn health_score(&self) -> f64 {
        if self.domains.is_empty() {
            return 1.0;
        }
        let closed = self
            .domains
            .values()
            .filter(|m| m.status == CircuitStatus::Closed)
            .count();
        closed as f64 / self.domains.len() as f64
    }
}

impl Default for SystemCircuitMetrics {
    fn default() -> Self {
        Self::new()
    }
}
