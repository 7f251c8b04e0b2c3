use chrono::Duration;
use tracing::{debug, warn};

use super::features::{FeatureBuilder, FeatureRow, DEFAULT_LAGS};
use super::weather::{diurnal_temperature, TemperatureSource};
use crate::domain::{ForecastPoint, LoadSeries};

/// Default forecast horizon (steps)
pub const DEFAULT_HORIZON: usize = 24;

/// Forecasting and model-fitting errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Insufficient history: need {needed} points, have {available}")]
    InsufficientHistory { needed: usize, available: usize },

    #[error("Empty training set")]
    EmptyTrainingSet,

    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model training failed: {0}")]
    Training(String),
}

/// Anything that maps a feature row to a load estimate (kW).
///
/// Model choice, training and persistence live behind this trait.
#[cfg_attr(test, mockall::automock)]
pub trait LoadPredictor {
    fn predict(&self, row: &FeatureRow) -> anyhow::Result<f64>;

    fn name(&self) -> &'static str;
}

/// Multi-step forecaster feeding each prediction back as lag_1 of the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecursiveForecaster {
    horizon: usize,
    step: Duration,
    features: FeatureBuilder,
}

impl Default for RecursiveForecaster {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON, DEFAULT_LAGS)
    }
}

impl RecursiveForecaster {
    pub fn new(horizon: usize, n_lags: usize) -> Self {
        Self {
            horizon,
            step: Duration::hours(1),
            features: FeatureBuilder::new(n_lags),
        }
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Forecast `horizon` hourly points following the end of `history`.
    pub fn forecast(
        &self,
        predictor: &dyn LoadPredictor,
        weather: Option<&dyn TemperatureSource>,
        history: &LoadSeries,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let seed = self.features.seed_row(history, self.step)?;
        Ok(self.forecast_from(seed, predictor, weather))
    }

    /// Run the recursive loop from an already built seed row.
    pub fn forecast_from(
        &self,
        seed: FeatureRow,
        predictor: &dyn LoadPredictor,
        weather: Option<&dyn TemperatureSource>,
    ) -> Vec<ForecastPoint> {
        let mut row = seed;
        let mut points = Vec::with_capacity(self.horizon);
        let mut fallbacks = 0usize;
        let mut missing_temperature = 0usize;

        for _ in 0..self.horizon {
            let external = weather
                .and_then(|w| w.temperature_at(row.timestamp))
                .filter(|t| t.is_finite());
            if weather.is_some() && external.is_none() {
                missing_temperature += 1;
            }
            row.temperature_c = external.unwrap_or_else(|| diurnal_temperature(row.timestamp));

            let predicted = match predictor.predict(&row) {
                Ok(value) if value.is_finite() => value,
                Ok(value) => {
                    fallbacks += 1;
                    warn!(ts = %row.timestamp, value, "non-finite prediction, using lag_1");
                    row.lag(1).unwrap_or(0.0)
                }
                Err(e) => {
                    fallbacks += 1;
                    warn!(ts = %row.timestamp, error = %e, "predictor failed, using lag_1");
                    row.lag(1).unwrap_or(0.0)
                }
            }
            .max(0.0);

            points.push(ForecastPoint::new(row.timestamp, predicted).with_temperature(row.temperature_c));
            let next = row.timestamp + self.step;
            row.advance(predicted, next);
        }

        if missing_temperature > 0 {
            warn!(
                steps = missing_temperature,
                "temperature forecast unavailable, using diurnal estimate"
            );
        }
        debug!(
            model = predictor.name(),
            horizon = self.horizon,
            fallbacks,
            "recursive forecast complete"
        );
        points
    }
}
