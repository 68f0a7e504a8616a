//! Random forest regressor: aprender's bagged CART trees, averaged.

use aprender::tree::RandomForestRegressor;
use serde::{Deserialize, Serialize};

use super::{check_training_data, to_matrix, to_vector, FitError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_estimators: usize,
    /// `None` grows every tree until its leaves are pure
    pub max_depth: Option<usize>,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    forest: RandomForestRegressor,
}

impl RandomForest {
    /// Fit `n_estimators` trees, each on a bootstrap sample of the rows.
    ///
    /// # Errors
    /// Returns [`FitError`] if the training data is empty or ragged.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &RandomForestParams) -> Result<Self, FitError> {
        let n_features = check_training_data(x, y)?;
        if params.n_estimators == 0 {
            return Err(FitError::InvalidParams("n_estimators must be > 0".into()));
        }

        let mut forest =
            RandomForestRegressor::new(params.n_estimators).with_random_state(params.seed);
        if let Some(depth) = params.max_depth {
            forest = forest.with_max_depth(depth);
        }
        forest
            .fit(&to_matrix(x, n_features)?, &to_vector(y))
            .map_err(|e| FitError::Solve(e.to_string()))?;

        tracing::debug!("Random forest fitted: {} trees", params.n_estimators);
        Ok(Self { n_features, forest })
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        match to_matrix(&[row.to_vec()], self.n_features) {
            Ok(sample) => f64::from(self.forest.predict(&sample).as_slice()[0]),
            Err(_) => f64::NAN,
        }
    }
}
