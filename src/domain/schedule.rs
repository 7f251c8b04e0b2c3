use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::BatteryStatus;

/// One hour of a battery dispatch schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchStep {
    pub timestamp: NaiveDateTime,
    pub load_kw: f64,
    pub pv_kw: f64,
    /// Grid import without the battery
    pub grid_baseline_kw: f64,
    /// Positive = discharging to load, negative = charging
    pub battery_kw: f64,
    /// Grid import with the battery following this schedule
    pub grid_optimized_kw: f64,
    pub tariff_rate: f64,
    /// State of charge after this step, whole percent
    pub soc_pct: u8,
}

impl DispatchStep {
    pub fn status(&self) -> BatteryStatus {
        BatteryStatus::from_power_kw(self.battery_kw)
    }

    pub fn baseline_cost(&self) -> f64 {
        self.grid_baseline_kw * self.tariff_rate
    }

    pub fn optimized_cost(&self) -> f64 {
        self.grid_optimized_kw * self.tariff_rate
    }
}
