//! # Solar Production Estimate
//!
//! Diurnal PV model: a half-sine between 06:00 and 18:00 peaking at solar
//! noon, scaled by a user PV factor and lightly derated on hot days.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// PV model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvModel {
    /// Output at solar noon with `pv_factor = 1.0` (kW)
    pub peak_kw: f64,
    /// Ambient temperature above which output is derated (°C)
    pub derate_threshold_c: f64,
    /// Fractional output lost per °C above the threshold
    pub derate_per_c: f64,
}

impl Default for PvModel {
    fn default() -> Self {
        Self {
            peak_kw: 3.0,
            derate_threshold_c: 30.0,
            derate_per_c: 0.005,
        }
    }
}

impl PvModel {
    /// Estimated PV output in kW. Never negative.
    pub fn estimate(&self, ts: NaiveDateTime, temperature_c: Option<f64>, pv_factor: f64) -> f64 {
        let hour = ts.hour() as f64;
        let shape = (PI * (hour - 6.0) / 12.0).sin().max(0.0);
        let mut pv = self.peak_kw * shape * pv_factor;

        if let Some(t) = temperature_c.filter(|t| t.is_finite()) {
            pv *= 1.0 - (t - self.derate_threshold_c).max(0.0) * self.derate_per_c;
        }

        if pv.is_finite() {
            pv.max(0.0)
        } else {
            0.0
        }
    }
}

/// [`PvModel::estimate`] with the default model.
pub fn estimate_pv(ts: NaiveDateTime, temperature_c: Option<f64>, pv_factor: f64) -> f64 {
    PvModel::default().estimate(ts, temperature_c, pv_factor)
}
