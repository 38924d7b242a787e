//! # Circuit State
//!
//! Per-domain circuit state and its transitions:
//!
//! ```text
//! Closed --(consecutive failures >= threshold)--> Open
//! Open   --(cooldown elapsed since last failure)--> Closed
//! ```
//!
//! There is no limited half-open state. Once the cooldown has elapsed the
//! next evaluation resets the failure count and closes the circuit, so the
//! next call is attempted live and its outcome drives the next transition.
//! A renewed failure burst therefore needs a full threshold to reopen.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Coarse circuit status used in metrics and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitStatus {
    /// Normal operation - calls are allowed through
    Closed,
    /// Failure mode - calls fail fast without executing
    Open,
}

/// State of one failure domain's circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitState {
    pub domain: String,
    pub consecutive_failures: u32,
    pub last_failure_at: Option<Instant>,
    pub is_open: bool,
}

impl CircuitState {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            consecutive_failures: 0,
            last_failure_at: None,
            is_open: false,
        }
    }

    pub fn status(&self) -> CircuitStatus {
        if self.is_open {
            CircuitStatus::Open
        } else {
            CircuitStatus::Closed
        }
    }

    /// Evaluate whether calls are currently rejected.
    ///
    /// An open circuit whose cooldown has strictly elapsed is reset to closed
    /// with a zero failure count; the returned flag is then `false`.
    pub(crate) fn evaluate(&mut self, cooldown: Duration, now: Instant) -> bool {
        if !self.is_open {
            return false;
        }

        let cooled_down = match self.last_failure_at {
            Some(at) => now.saturating_duration_since(at) > cooldown,
            None => true,
        };

        if cooled_down {
            self.consecutive_failures = 0;
            self.is_open = false;
            false
        } else {
            true
        }
    }

    pub(crate) fn on_success(&mut self) {
        self.consecutive_failures = 0;
        self.is_open = false;
    }

    /// Record a failure; returns true when this failure opened the circuit
    pub(crate) fn on_failure(&mut self, threshold: u32, now: Instant, may_open: bool) -> bool {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure_at = Some(now);

        if may_open && !self.is_open && self.consecutive_failures >= threshold {
            self.is_open = true;
            return true;
        }
        false
    }
}
