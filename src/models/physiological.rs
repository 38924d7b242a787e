//! Wearable integrations and the physiological reading they produce

use crate::constants::PHYSIOLOGICAL_SCHEMA_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Supported wearable integrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WearableKind {
    Oura,
    Whoop,
    Fitbit,
    Garmin,
    AppleHealth,
    GoogleFit,
}

impl WearableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WearableKind::Oura => "oura",
            WearableKind::Whoop => "whoop",
            WearableKind::Fitbit => "fitbit",
            WearableKind::Garmin => "garmin",
            WearableKind::AppleHealth => "apple_health",
            WearableKind::GoogleFit => "google_fit",
        }
    }
}

impl fmt::Display for WearableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the connection registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WearableConnection {
    pub kind: WearableKind,
    pub connected: bool,
}

/// Most recent physiological metrics from a wearable.
///
/// Every metric is optional; devices report different subsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysiologicalReading {
    pub schema_version: u8,
    pub source: WearableKind,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate_bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hrv_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_temp_delta_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl PhysiologicalReading {
    /// Empty reading from `source` taken at `recorded_at`
    pub fn new(source: WearableKind, recorded_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: PHYSIOLOGICAL_SCHEMA_VERSION,
            source,
            recorded_at,
            heart_rate_bpm: None,
            resting_heart_rate_bpm: None,
            hrv_ms: None,
            sleep_hours: None,
            spo2_percent: None,
            respiratory_rate: None,
            skin_temp_delta_c: None,
            steps: None,
        }
    }

    /// Whether the reading is younger than `window` at `now`
    pub fn is_fresh_at(&self, window: Duration, now: DateTime<Utc>) -> bool {
        match (now - self.recorded_at).to_std() {
            Ok(age) => age < window,
            // Recorded "in the future" (clock skew): treat as fresh
            Err(_) => true,
        }
    }

    pub fn is_fresh(&self, window: Duration) -> bool {
        self.is_fresh_at(window, Utc::now())
    }
}
