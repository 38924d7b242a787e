//! Device coordinates

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Stable key fragment with coordinates rounded to `precision` decimals
    pub fn rounded_key(&self, precision: usize) -> String {
        format!(
            "{:.prec$}:{:.prec$}",
            self.latitude,
            self.longitude,
            prec = precision
        )
    }
}
