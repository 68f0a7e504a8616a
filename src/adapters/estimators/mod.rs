//! Regression estimators used by the trainer and the predictor.
//!
//! Tree ensembles are built on aprender's CART trees and SVR is solved by
//! `linfa_svm`. Every fitted estimator is serde data, so the whole model
//! serializes to JSON through [`TrainedModel`].

pub mod boosting;
pub mod forest;
pub mod linear;
pub mod metrics;
pub mod svr;

use aprender::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};

use crate::ports::Regressor;

pub use boosting::{BoostedTrees, BoostingParams};
pub use forest::{RandomForest, RandomForestParams};
pub use linear::LinearRegression;
pub use metrics::r2_score;
pub use svr::{Svr, SvrParams};

/// Error raised while fitting an estimator.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("Training data is empty")]
    Empty,

    #[error("Row {row} has {got} features, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Feature matrix has {rows} rows but target has {targets} values")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("Non-finite value in training data at row {row}")]
    NonFinite { row: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Solver failed: {0}")]
    Solve(String),
}

/// Validate a training matrix and return its feature count.
pub(crate) fn check_training_data(x: &[Vec<f64>], y: &[f64]) -> Result<usize, FitError> {
    if x.is_empty() || y.is_empty() {
        return Err(FitError::Empty);
    }
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            rows: x.len(),
            targets: y.len(),
        });
    }

    let n_features = x[0].len();
    if n_features == 0 {
        return Err(FitError::Empty);
    }
    for (row, (values, target)) in x.iter().zip(y).enumerate() {
        if values.len() != n_features {
            return Err(FitError::Shape {
                row,
                expected: n_features,
                got: values.len(),
            });
        }
        if !target.is_finite() || values.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite { row });
        }
    }
    Ok(n_features)
}

/// Row-major single-precision matrix for aprender.
pub(crate) fn to_matrix(x: &[Vec<f64>], n_features: usize) -> Result<Matrix<f32>, FitError> {
    let mut data = Vec::with_capacity(x.len() * n_features);
    for (row, values) in x.iter().enumerate() {
        if values.len() != n_features {
            return Err(FitError::Shape {
                row,
                expected: n_features,
                got: values.len(),
            });
        }
        data.extend(values.iter().map(|&v| v as f32));
    }
    Matrix::from_vec(x.len(), n_features, data).map_err(|e| FitError::Solve(e.to_string()))
}

pub(crate) fn to_vector(y: &[f64]) -> Vector<f32> {
    Vector::from_vec(y.iter().map(|&v| v as f32).collect())
}

/// The candidate estimators, in the order the trainer evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    RandomForest,
    XgBoost,
    GradientBoosting,
    LinearRegression,
    Svr,
}

impl EstimatorKind {
    pub const ALL: [Self; 5] = [
        Self::RandomForest,
        Self::XgBoost,
        Self::GradientBoosting,
        Self::LinearRegression,
        Self::Svr,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomForest => "RandomForest",
            Self::XgBoost => "XGBoost",
            Self::GradientBoosting => "GradientBoosting",
            Self::LinearRegression => "LinearRegression",
            Self::Svr => "SVR",
        }
    }

    /// Fit this estimator with its fixed hyperparameters.
    ///
    /// `seed` drives the forest's bootstrap samples.
    ///
    /// # Errors
    /// Returns [`FitError`] if the data cannot be fitted.
    pub fn fit(&self, x: &[Vec<f64>], y: &[f64], seed: u64) -> Result<TrainedModel, FitError> {
        Ok(match self {
            Self::RandomForest => TrainedModel::RandomForest(RandomForest::fit(
                x,
                y,
                &RandomForestParams {
                    seed,
                    ..Default::default()
                },
            )?),
            Self::XgBoost => {
                TrainedModel::XgBoost(BoostedTrees::fit(x, y, &BoostingParams::xgboost())?)
            }
            Self::GradientBoosting => TrainedModel::GradientBoosting(BoostedTrees::fit(
                x,
                y,
                &BoostingParams::gradient_boosting(),
            )?),
            Self::LinearRegression => TrainedModel::LinearRegression(LinearRegression::fit(x, y)?),
            Self::Svr => TrainedModel::Svr(Svr::fit(x, y, &SvrParams::default())?),
        })
    }
}

impl std::fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fitted estimator of any supported kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "estimator", content = "params", rename_all = "snake_case")]
pub enum TrainedModel {
    RandomForest(RandomForest),
    XgBoost(BoostedTrees),
    GradientBoosting(BoostedTrees),
    LinearRegression(LinearRegression),
    Svr(Svr),
}

impl TrainedModel {
    #[must_use]
    pub fn kind(&self) -> EstimatorKind {
        match self {
            Self::RandomForest(_) => EstimatorKind::RandomForest,
            Self::XgBoost(_) => EstimatorKind::XgBoost,
            Self::GradientBoosting(_) => EstimatorKind::GradientBoosting,
            Self::LinearRegression(_) => EstimatorKind::LinearRegression,
            Self::Svr(_) => EstimatorKind::Svr,
        }
    }
}

impl Regressor for TrainedModel {
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn n_features(&self) -> usize {
        match self {
            Self::RandomForest(m) => m.n_features(),
            Self::XgBoost(m) | Self::GradientBoosting(m) => m.n_features(),
            Self::LinearRegression(m) => m.n_features(),
            Self::Svr(m) => m.n_features(),
        }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            Self::RandomForest(m) => m.predict_row(row),
            Self::XgBoost(m) | Self::GradientBoosting(m) => m.predict_row(row),
            Self::LinearRegression(m) => m.predict_row(row),
            Self::Svr(m) => m.predict_row(row),
        }
    }
}
