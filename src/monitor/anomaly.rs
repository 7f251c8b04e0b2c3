use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::stats::rolling_mean_std;
use crate::domain::LoadSeries;

/// Fewer points than this are not scanned.
pub const MIN_ANOMALY_POINTS: usize = 10;
/// Only the most recent anomalies are reported.
pub const MAX_ANOMALIES: usize = 50;
pub const Z_THRESHOLD: f64 = 3.0;

const MIN_WINDOW: usize = 5;
const MIN_PERIODS: usize = 5;

/// A reading far outside its trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub z_score: f64,
}

/// Rolling z-score scan over roughly one day of trailing readings.
///
/// The window includes the reading being scored. Windows with zero spread
/// produce no score.
pub fn detect_anomalies(series: &LoadSeries) -> Vec<AnomalyPoint> {
    if series.len() < MIN_ANOMALY_POINTS {
        return Vec::new();
    }

    let window = series.steps_per_day().max(MIN_WINDOW);
    let values = series.consumption();
    let stats = rolling_mean_std(&values, window, MIN_PERIODS);

    let anomalies: Vec<AnomalyPoint> = series
        .points()
        .iter()
        .zip(stats)
        .filter_map(|(point, stat)| {
            let (mean, std) = stat?;
            if std == 0.0 || !std.is_finite() {
                return None;
            }
            let z_score = (point.consumption_kw - mean) / std;
            (z_score.abs() >= Z_THRESHOLD).then_some(AnomalyPoint {
                timestamp: point.timestamp,
                value: point.consumption_kw,
                z_score,
            })
        })
        .collect();

    let skip = anomalies.len().saturating_sub(MAX_ANOMALIES);
    anomalies.into_iter().skip(skip).collect()
}
