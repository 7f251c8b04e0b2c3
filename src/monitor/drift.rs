use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stats::{mean, sample_variance};
use crate::domain::LoadSeries;

/// Fewer points than this carry no drift signal.
pub const MIN_DRIFT_POINTS: usize = 48;

const HIGH_CHANGE_PCT: f64 = 20.0;
const HIGH_Z: f64 = 2.5;
const WARN_CHANGE_PCT: f64 = 10.0;
const WARN_Z: f64 = 1.8;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DriftLevel {
    #[default]
    Low,
    Warn,
    High,
}

/// Last day of load compared with the day before it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Change of the mean, percent of the previous day's mean
    pub change_pct: f64,
    /// Two-sample z statistic of the mean difference
    pub z_score: f64,
    pub level: DriftLevel,
}

impl DriftReport {
    pub fn no_signal() -> Self {
        Self::default()
    }

    fn classify(change_pct: f64, z_score: f64) -> DriftLevel {
        if change_pct.abs() >= HIGH_CHANGE_PCT || z_score.abs() >= HIGH_Z {
            DriftLevel::High
        } else if change_pct.abs() >= WARN_CHANGE_PCT || z_score.abs() >= WARN_Z {
            DriftLevel::Warn
        } else {
            DriftLevel::Low
        }
    }
}

/// Compare the trailing day of `series` with the day before it.
///
/// A day is `round(24 / dt)` points where `dt` is the median timestep. Both
/// windows count as that many samples in the pooled variance even if the
/// history is shorter than two days.
pub fn compute_drift(series: &LoadSeries) -> DriftReport {
    if series.len() < MIN_DRIFT_POINTS {
        return DriftReport::no_signal();
    }

    let steps_day = series.steps_per_day();
    let values = series.consumption();
    let last = &values[values.len().saturating_sub(steps_day)..];
    let two_days = &values[values.len().saturating_sub(2 * steps_day)..];
    let prev = &two_days[..steps_day.min(two_days.len())];

    let m1 = mean(last);
    let m0 = mean(prev);
    let v1 = sample_variance(last);
    let v0 = sample_variance(prev);

    let change_pct = if m0 == 0.0 { 0.0 } else { (m1 - m0) / m0 * 100.0 };

    let n = steps_day as f64;
    let pooled_var = ((n - 1.0) * v0 + (n - 1.0) * v1) / (2.0 * n - 2.0).max(1.0);
    let pooled_std = pooled_var.max(1e-9).sqrt();
    let z_score = (m1 - m0) / (pooled_std / n.sqrt());

    let report = DriftReport {
        change_pct,
        z_score,
        level: DriftReport::classify(change_pct, z_score),
    };
    debug!(steps_day, m0, m1, level = %report.level, "computed drift");
    report
}
