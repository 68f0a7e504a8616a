//! Gradient boosted regression trees (squared error loss).
//!
//! Each round fits an aprender [`DecisionTreeRegressor`] to the residuals of
//! the ensemble so far and adds its shrunken output. Two presets share this
//! loop:
//! - classic gradient boosting: depth-3 trees
//! - XGBoost-style boosting: depth-6 trees

use aprender::primitives::{Matrix, Vector};
use aprender::tree::DecisionTreeRegressor;
use serde::{Deserialize, Serialize};

use super::{check_training_data, to_matrix, FitError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

impl BoostingParams {
    /// 300 depth-3 trees, learning rate 0.1.
    #[must_use]
    pub fn gradient_boosting() -> Self {
        Self {
            n_estimators: 300,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
        }
    }

    /// 300 depth-6 trees, learning rate 0.1.
    #[must_use]
    pub fn xgboost() -> Self {
        Self {
            n_estimators: 300,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedTrees {
    n_features: usize,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<DecisionTreeRegressor>,
}

fn predict_f64(tree: &DecisionTreeRegressor, x: &Matrix<f32>) -> Vec<f64> {
    tree.predict(x)
        .as_slice()
        .iter()
        .map(|&v| f64::from(v))
        .collect()
}

impl BoostedTrees {
    /// Fit trees sequentially, each on the residuals of the current ensemble.
    ///
    /// The ensemble starts from the target mean.
    ///
    /// # Errors
    /// Returns [`FitError`] if the training data is empty or ragged, the
    /// learning rate is not positive, or a tree fails to fit.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &BoostingParams) -> Result<Self, FitError> {
        let n_features = check_training_data(x, y)?;
        if !(params.learning_rate > 0.0) {
            return Err(FitError::InvalidParams(format!(
                "learning_rate must be > 0, got {}",
                params.learning_rate
            )));
        }

        let matrix = to_matrix(x, n_features)?;
        let base_score = y.iter().sum::<f64>() / y.len() as f64;
        let mut current = vec![base_score; y.len()];

        let mut trees = Vec::with_capacity(params.n_estimators);
        for _ in 0..params.n_estimators {
            // f32 residuals: aprender trees work in single precision
            let residuals: Vec<f32> = y
                .iter()
                .zip(&current)
                .map(|(t, f)| (t - f) as f32)
                .collect();

            let mut tree = DecisionTreeRegressor::new()
                .with_max_depth(params.max_depth)
                .with_min_samples_leaf(params.min_samples_leaf);
            tree.fit(&matrix, &Vector::from_vec(residuals))
                .map_err(|e| FitError::Solve(e.to_string()))?;

            for (f, step) in current.iter_mut().zip(predict_f64(&tree, &matrix)) {
                *f += params.learning_rate * step;
            }
            trees.push(tree);
        }

        Ok(Self {
            n_features,
            base_score,
            learning_rate: params.learning_rate,
            trees,
        })
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let Ok(sample) = to_matrix(&[row.to_vec()], self.n_features) else {
            return f64::NAN;
        };
        let boost: f64 = self
            .trees
            .iter()
            .map(|tree| predict_f64(tree, &sample)[0])
            .sum();
        self.base_score + self.learning_rate * boost
    }
}
