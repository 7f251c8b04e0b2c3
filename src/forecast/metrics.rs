//! Holdout accuracy of a load predictor.
//!
//! The planner sizes the forecast band from the MAE and reports the rest.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::LoadPredictor;
use super::features::LabeledRow;

/// MAE assumed when there is no holdout to measure one (kW)
pub const DEFAULT_MAE_KW: f64 = 0.5;

/// Readings at or below this are left out of MAPE (kW)
const MAPE_FLOOR_KW: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mae: f64,
    pub rmse: f64,
    /// Percent; zero when every observed load is near zero
    pub mape: f64,
    /// Zero for a flat holdout
    pub r2: f64,
    pub sample_count: usize,
}

impl ForecastMetrics {
    /// Compare observed loads with predictions, pairwise.
    pub fn calculate(observed: &[f64], predicted: &[f64]) -> Result<Self, MetricsError> {
        if observed.len() != predicted.len() {
            return Err(MetricsError::DimensionMismatch {
                actual: observed.len(),
                predicted: predicted.len(),
            });
        }
        if observed.is_empty() {
            return Err(MetricsError::EmptyData);
        }

        let n = observed.len() as f64;
        let residuals = || observed.iter().zip(predicted).map(|(o, p)| (*o, o - p));

        let mae = residuals().map(|(_, r)| r.abs()).sum::<f64>() / n;
        let sse = residuals().map(|(_, r)| r * r).sum::<f64>();

        let (pct_sum, pct_n) = residuals()
            .filter(|(o, _)| o.abs() > MAPE_FLOOR_KW)
            .fold((0.0, 0usize), |(s, c), (o, r)| (s + (r / o).abs() * 100.0, c + 1));

        let mean = observed.iter().sum::<f64>() / n;
        let sst = observed.iter().map(|o| (o - mean).powi(2)).sum::<f64>();

        Ok(Self {
            mae,
            rmse: (sse / n).sqrt(),
            mape: if pct_n == 0 { 0.0 } else { pct_sum / pct_n as f64 },
            r2: if sst > 1e-10 { 1.0 - sse / sst } else { 0.0 },
            sample_count: observed.len(),
        })
    }
}

impl fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mae={:.3}kW rmse={:.3}kW mape={:.1}% r2={:.3} n={}",
            self.mae, self.rmse, self.mape, self.r2, self.sample_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("Dimension mismatch: actual={actual}, predicted={predicted}")]
    DimensionMismatch { actual: usize, predicted: usize },

    #[error("Empty data provided")]
    EmptyData,

    #[error("Predictor failed: {0}")]
    Prediction(String),
}

/// Score `predictor` against the observed targets of `rows`.
pub fn evaluate(predictor: &dyn LoadPredictor, rows: &[LabeledRow]) -> Result<ForecastMetrics, MetricsError> {
    let predicted = rows
        .iter()
        .map(|r| predictor.predict(&r.features))
        .collect::<anyhow::Result<Vec<f64>>>()
        .map_err(|e| MetricsError::Prediction(e.to_string()))?;
    let observed: Vec<f64> = rows.iter().map(|r| r.target_kw).collect();

    ForecastMetrics::calculate(&observed, &predicted)
}
