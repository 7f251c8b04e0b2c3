use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::goal::SavingsGoal;
use super::policy::DispatchMode;
use crate::domain::DEFAULT_CAPACITY_KWH;

pub const PV_FACTOR_RANGE: RangeInclusive<f64> = 0.5..=2.0;
pub const POWER_LIMIT_RANGE_KW: RangeInclusive<f64> = 0.0..=10.0;
pub const SOC_INIT_RANGE_PCT: RangeInclusive<f64> = 0.0..=100.0;
pub const SOC_MIN_RANGE_PCT: RangeInclusive<f64> = 0.0..=80.0;

/// Inputs of one dispatch optimization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub pv_factor: f64,
    pub power_limit_kw: f64,
    pub soc_init_pct: f64,
    /// Hard floor the optimizer never discharges below
    pub soc_min_pct: f64,
    pub capacity_kwh: f64,
    pub mode: DispatchMode,
    /// Stop at the first candidate saving at least this much per day
    pub target_daily_savings: Option<f64>,
}

impl Default for DispatchRequest {
    fn default() -> Self {
        Self {
            pv_factor: 1.0,
            power_limit_kw: 2.0,
            soc_init_pct: 50.0,
            soc_min_pct: 0.0,
            capacity_kwh: DEFAULT_CAPACITY_KWH,
            mode: DispatchMode::Normal,
            target_daily_savings: None,
        }
    }
}

impl DispatchRequest {
    pub fn with_goal(mut self, goal: Option<&SavingsGoal>) -> Self {
        self.target_daily_savings = goal.map(|g| g.daily_target);
        self
    }

    /// Copy with every numeric field forced into its accepted range.
    /// Non-finite values take the default.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            pv_factor: clamp_to(self.pv_factor, &PV_FACTOR_RANGE, defaults.pv_factor),
            power_limit_kw: clamp_to(self.power_limit_kw, &POWER_LIMIT_RANGE_KW, defaults.power_limit_kw),
            soc_init_pct: clamp_to(self.soc_init_pct, &SOC_INIT_RANGE_PCT, defaults.soc_init_pct),
            soc_min_pct: clamp_to(self.soc_min_pct, &SOC_MIN_RANGE_PCT, defaults.soc_min_pct),
            capacity_kwh: if self.capacity_kwh.is_finite() && self.capacity_kwh > 0.0 {
                self.capacity_kwh
            } else {
                defaults.capacity_kwh
            },
            mode: self.mode,
            target_daily_savings: self.target_daily_savings.filter(|t| t.is_finite()),
        }
    }
}

/// Clamp `v` into `range`, substituting `fallback` for NaN and infinities.
pub fn clamp_to(v: f64, range: &RangeInclusive<f64>, fallback: f64) -> f64 {
    if v.is_finite() {
        v.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}
