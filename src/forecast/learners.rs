//! SmartCore-backed load predictors
//!
//! Random forest plus the three linear models (ordinary, ridge, lasso),
//! fitted on the lag feature rows. All of them sit behind [`LoadPredictor`]
//! so the forecaster and the model selection never see SmartCore types.

use anyhow::anyhow;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::lasso::{Lasso, LassoParameters};
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};
use std::fmt;
use tracing::warn;

use super::engine::{ForecastError, LoadPredictor};
use super::features::{FeatureRow, LabeledRow};

pub const LASSO_ALPHA: f64 = 0.001;
pub const LASSO_MAX_ITER: usize = 10_000;

type Matrix = DenseMatrix<f64>;

/// Model families fitted by [`Learner::fit`]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum LearnerKind {
    RandomForest,
    Linear,
    Ridge,
    Lasso,
}

enum Model {
    RandomForest(RandomForestRegressor<f64, f64, Matrix, Vec<f64>>),
    Linear(LinearRegression<f64, f64, Matrix, Vec<f64>>),
    Ridge(RidgeRegression<f64, f64, Matrix, Vec<f64>>),
    Lasso(Lasso<f64, f64, Matrix, Vec<f64>>),
}

/// A fitted SmartCore model over feature vectors of a fixed width.
pub struct Learner {
    kind: LearnerKind,
    n_features: usize,
    model: Model,
}

impl fmt::Debug for Learner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Learner")
            .field("kind", &self.kind)
            .field("n_features", &self.n_features)
            .finish()
    }
}

impl Learner {
    /// Forest settings sized for a few weeks of hourly rows.
    pub fn forest_parameters() -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            max_depth: Some(10),
            min_samples_leaf: 2,
            min_samples_split: 5,
            n_trees: 50,
            m: None,
            keep_samples: false,
            seed: 42,
        }
    }

    /// Fit one model family. `ridge_alpha` only applies to [`LearnerKind::Ridge`].
    pub fn fit(kind: LearnerKind, rows: &[LabeledRow], ridge_alpha: f64) -> Result<Self, ForecastError> {
        let (x, y, n_features) = design_matrix(rows)?;
        let failed = |e: smartcore::error::Failed| ForecastError::Training(format!("{kind}: {e}"));

        let model = match kind {
            LearnerKind::RandomForest => {
                Model::RandomForest(RandomForestRegressor::fit(&x, &y, Self::forest_parameters()).map_err(failed)?)
            }
            LearnerKind::Linear => {
                Model::Linear(LinearRegression::fit(&x, &y, LinearRegressionParameters::default()).map_err(failed)?)
            }
            LearnerKind::Ridge => {
                // Standardized features, unpenalized intercept
                let params = RidgeRegressionParameters::default()
                    .with_alpha(ridge_alpha.max(0.0))
                    .with_normalize(true);
                Model::Ridge(RidgeRegression::fit(&x, &y, params).map_err(failed)?)
            }
            LearnerKind::Lasso => {
                let params = LassoParameters::default()
                    .with_alpha(LASSO_ALPHA)
                    .with_normalize(true)
                    .with_max_iter(LASSO_MAX_ITER);
                Model::Lasso(Lasso::fit(&x, &y, params).map_err(failed)?)
            }
        };

        Ok(Self {
            kind,
            n_features,
            model,
        })
    }

    pub fn kind(&self) -> LearnerKind {
        self.kind
    }
}

impl LoadPredictor for Learner {
    fn predict(&self, row: &FeatureRow) -> anyhow::Result<f64> {
        let features = row.to_vector();
        if features.len() != self.n_features {
            return Err(ForecastError::DimensionMismatch {
                expected: self.n_features,
                actual: features.len(),
            }
            .into());
        }
        let x = DenseMatrix::new(1, self.n_features, features, false);

        let predictions = match &self.model {
            Model::RandomForest(m) => m.predict(&x),
            Model::Linear(m) => m.predict(&x),
            Model::Ridge(m) => m.predict(&x),
            Model::Lasso(m) => m.predict(&x),
        }
        .map_err(|e| anyhow!("{} prediction failed: {e}", self.kind))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| anyhow!("{} returned no prediction", self.kind))
    }

    fn name(&self) -> &'static str {
        self.kind.into()
    }
}

/// Fit every family, skipping the ones that fail on these rows.
pub fn fit_learners(rows: &[LabeledRow], ridge_alpha: f64) -> Vec<Box<dyn LoadPredictor>> {
    use strum::IntoEnumIterator;

    LearnerKind::iter()
        .filter_map(|kind| match Learner::fit(kind, rows, ridge_alpha) {
            Ok(learner) => Some(Box::new(learner) as Box<dyn LoadPredictor>),
            Err(e) => {
                warn!(model = %kind, rows = rows.len(), error = %e, "model fit failed, skipping");
                None
            }
        })
        .collect()
}

/// Row-major design matrix and targets; every row must have the same width.
fn design_matrix(rows: &[LabeledRow]) -> Result<(Matrix, Vec<f64>, usize), ForecastError> {
    let first = rows.first().ok_or(ForecastError::EmptyTrainingSet)?;
    let n_features = first.features.to_vector().len();

    let mut flat = Vec::with_capacity(rows.len() * n_features);
    for row in rows {
        let v = row.features.to_vector();
        if v.len() != n_features {
            return Err(ForecastError::DimensionMismatch {
                expected: n_features,
                actual: v.len(),
            });
        }
        flat.extend(v);
    }
    let y = rows.iter().map(|r| r.target_kw).collect();

    Ok((DenseMatrix::new(rows.len(), n_features, flat, false), y, n_features))
}
