use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One step of the load forecast trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    /// Predicted load in kW, never negative
    pub predicted_load_kw: f64,
    /// Temperature fed to the predictor for this step (°C)
    pub temperature_c: Option<f64>,
}

impl ForecastPoint {
    pub fn new(timestamp: NaiveDateTime, predicted_load_kw: f64) -> Self {
        Self {
            timestamp,
            predicted_load_kw: predicted_load_kw.max(0.0),
            temperature_c: None,
        }
    }

    pub fn with_temperature(mut self, temperature_c: f64) -> Self {
        self.temperature_c = Some(temperature_c);
        self
    }
}

/// Symmetric uncertainty band around a forecast trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBand {
    pub timestamps: Vec<NaiveDateTime>,
    pub median_kw: Vec<f64>,
    pub lower_kw: Vec<f64>,
    pub upper_kw: Vec<f64>,
}

impl ForecastBand {
    /// `y ± k·mae` around each point, clamped at zero.
    pub fn from_mae(points: &[ForecastPoint], mae: f64, k: f64) -> Self {
        let half_width = (k * mae).abs();
        let half_width = if half_width.is_finite() { half_width } else { 0.0 };

        Self {
            timestamps: points.iter().map(|p| p.timestamp).collect(),
            median_kw: points.iter().map(|p| p.predicted_load_kw).collect(),
            lower_kw: points
                .iter()
                .map(|p| (p.predicted_load_kw - half_width).max(0.0))
                .collect(),
            upper_kw: points
                .iter()
                .map(|p| (p.predicted_load_kw + half_width).max(0.0))
                .collect(),
        }
    }
}
