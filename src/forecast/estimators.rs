//! Load predictor selection
//!
//! `SeasonalNaive` repeats the load from one season ago and is always
//! available. With the `ml` feature the SmartCore learners join it, and the
//! candidate with the lowest holdout MAE is kept.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::LoadPredictor;
use super::features::{FeatureBuilder, FeatureRow, LabeledRow};
use super::metrics::{evaluate, ForecastMetrics};
use crate::domain::LoadSeries;

/// Daily seasonality on hourly data
pub const DEFAULT_SEASON: usize = 24;
/// Ridge penalty
pub const DEFAULT_RIDGE_ALPHA: f64 = 1.0;

/// `lag_season` when the row has it, otherwise `lag_1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalNaive {
    pub season: usize,
}

impl Default for SeasonalNaive {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON,
        }
    }
}

impl LoadPredictor for SeasonalNaive {
    fn predict(&self, row: &FeatureRow) -> anyhow::Result<f64> {
        row.lag(self.season)
            .or_else(|| row.lag(1))
            .ok_or_else(|| anyhow!("feature row has no lags"))
    }

    fn name(&self) -> &'static str {
        "seasonal_naive"
    }
}

/// Time-ordered train/test split holding out roughly the last three days.
pub fn holdout_split(rows: &[LabeledRow], steps_per_day: usize) -> (&[LabeledRow], &[LabeledRow]) {
    let test_n = (rows.len() / 3).min((3 * steps_per_day).max(24));
    let split = rows.len().saturating_sub(test_n).max(1).min(rows.len());
    rows.split_at(split)
}

/// Predictor chosen by holdout MAE, with its holdout metrics when a
/// holdout existed.
pub struct TrainedPredictor {
    pub predictor: Box<dyn LoadPredictor>,
    pub metrics: Option<ForecastMetrics>,
}

impl std::fmt::Debug for TrainedPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedPredictor")
            .field("predictor", &self.predictor.name())
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Fit the candidates on `history` and keep the one with the lowest
/// holdout MAE. Candidates are tried in order (random forest, linear, ridge,
/// lasso, seasonal-naive) and ties keep the earlier one. Without a holdout
/// the first candidate that fitted is kept.
#[cfg_attr(not(feature = "ml"), allow(unused_variables))]
pub fn train_best(history: &LoadSeries, n_lags: usize, ridge_alpha: f64) -> TrainedPredictor {
    let rows = FeatureBuilder::new(n_lags).build(history.points());
    let (train, test) = holdout_split(&rows, history.steps_per_day());

    let mut candidates: Vec<Box<dyn LoadPredictor>> = Vec::new();
    #[cfg(feature = "ml")]
    candidates.extend(super::learners::fit_learners(train, ridge_alpha));
    candidates.push(Box::new(SeasonalNaive::default()));

    let mut best: Option<TrainedPredictor> = None;
    for predictor in candidates {
        let metrics = if test.is_empty() {
            None
        } else {
            evaluate(predictor.as_ref(), test).ok()
        };
        let mae = metrics.as_ref().map(|m| m.mae);
        let better = match (&best, mae) {
            (None, _) => true,
            (Some(current), Some(mae)) => current.metrics.as_ref().map_or(true, |m| mae < m.mae),
            (Some(_), None) => false,
        };
        debug!(model = predictor.name(), ?mae, better, "evaluated candidate");
        if better {
            best = Some(TrainedPredictor { predictor, metrics });
        }
    }

    best.unwrap_or_else(|| TrainedPredictor {
        predictor: Box::new(SeasonalNaive::default()),
        metrics: None,
    })
}
