//! Feature engineering for load forecasting
//!
//! Turns a load history into a supervised-learning design matrix: the `n`
//! preceding consumption values (lag_1 = most recent) plus calendar and
//! temperature features of the row's own timestamp.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::ForecastError;
use crate::domain::{LoadSeries, TimeSeriesPoint};

/// Lag count used by the dashboard forecaster
pub const DEFAULT_LAGS: usize = 24;

/// Predictor input for one timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: NaiveDateTime,
    /// Preceding consumption values, `lags[0]` being lag_1
    pub lags: Vec<f64>,
    /// Hour of day (0-23)
    pub hour: u32,
    /// Day of week (0=Monday, 6=Sunday)
    pub day_of_week: u32,
    /// Temperature (Celsius)
    pub temperature_c: f64,
}

impl FeatureRow {
    pub fn new(timestamp: NaiveDateTime, lags: Vec<f64>, temperature_c: f64) -> Self {
        Self {
            timestamp,
            lags,
            hour: timestamp.hour(),
            day_of_week: timestamp.weekday().num_days_from_monday(),
            temperature_c,
        }
    }

    /// 1-based lag accessor: `lag(1)` is the most recent value.
    pub fn lag(&self, k: usize) -> Option<f64> {
        k.checked_sub(1).and_then(|i| self.lags.get(i)).copied()
    }

    /// Flattened features in model order: lags, hour, day of week, temperature.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut v = Vec::with_capacity(self.lags.len() + 3);
        v.extend_from_slice(&self.lags);
        v.push(self.hour as f64);
        v.push(self.day_of_week as f64);
        v.push(self.temperature_c);
        v
    }

    /// Roll the row forward one step: the prediction for the current
    /// timestamp becomes lag_1 of the row at `next_timestamp`.
    pub fn advance(&mut self, prediction_kw: f64, next_timestamp: NaiveDateTime) {
        if !self.lags.is_empty() {
            self.lags.rotate_right(1);
            self.lags[0] = prediction_kw;
        }
        self.timestamp = next_timestamp;
        self.hour = next_timestamp.hour();
        self.day_of_week = next_timestamp.weekday().num_days_from_monday();
    }
}

/// Feature row paired with the observed load at its timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub features: FeatureRow,
    pub target_kw: f64,
}

/// Builds lag/calendar features from a load history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBuilder {
    n_lags: usize,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LAGS)
    }
}

impl FeatureBuilder {
    pub fn new(n_lags: usize) -> Self {
        Self { n_lags }
    }

    pub fn n_lags(&self) -> usize {
        self.n_lags
    }

    /// One row per point that has a full set of preceding values.
    ///
    /// The first `n_lags` points cannot produce rows and are skipped, so a
    /// series of length `L` yields `L - n_lags` rows.
    pub fn build(&self, points: &[TimeSeriesPoint]) -> Vec<LabeledRow> {
        (self.n_lags..points.len())
            .map(|i| {
                let point = &points[i];
                let lags = (1..=self.n_lags).map(|k| points[i - k].consumption_kw).collect();
                LabeledRow {
                    features: FeatureRow::new(point.timestamp, lags, point.temperature_c),
                    target_kw: point.consumption_kw,
                }
            })
            .collect()
    }

    /// Row for the first step after the end of `series`, `step` after the
    /// last reading, with the last `n_lags` observations as its lags.
    ///
    /// The temperature is carried over from the last reading; forecasters
    /// refresh it before predicting.
    pub fn seed_row(&self, series: &LoadSeries, step: Duration) -> Result<FeatureRow, ForecastError> {
        let last = series.last().ok_or(ForecastError::InsufficientHistory {
            needed: self.n_lags.max(1),
            available: 0,
        })?;
        if series.len() < self.n_lags {
            return Err(ForecastError::InsufficientHistory {
                needed: self.n_lags,
                available: series.len(),
            });
        }

        let lags = series
            .tail(self.n_lags)
            .iter()
            .rev()
            .map(|p| p.consumption_kw)
            .collect();

        Ok(FeatureRow::new(last.timestamp + step, lags, last.temperature_c))
    }
}
