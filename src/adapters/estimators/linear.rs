//! Ordinary least squares linear regression.
//!
//! Solved with SVD so that collinear or rank-deficient designs still yield
//! the minimum-norm solution instead of failing.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::{check_training_data, FitError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Fit `y ≈ intercept + x · coefficients`.
    ///
    /// # Errors
    /// Returns [`FitError`] if the data is empty or ragged, or the system is
    /// too ill-conditioned to solve.
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self, FitError> {
        let n_features = check_training_data(x, y)?;
        let n = y.len();

        let design = DMatrix::from_fn(n, n_features + 1, |i, j| {
            if j == 0 {
                1.0
            } else {
                x[i][j - 1]
            }
        });
        let target = DVector::from_column_slice(y);

        let svd = design.svd(true, true);
        // Relax the singular value cutoff if the strict solve fails.
        for &tol in &[1e-10, 1e-8, 1e-6] {
            if let Ok(beta) = svd.solve(&target, tol) {
                if beta.iter().all(|v| v.is_finite()) {
                    return Ok(Self {
                        intercept: beta[0],
                        coefficients: beta.iter().skip(1).copied().collect(),
                    });
                }
            }
        }

        Err(FitError::Solve(
            "least squares system is too ill-conditioned".into(),
        ))
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    #[must_use]
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }

    /// Build a model from known parameters.
    #[must_use]
    pub fn from_parts(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}
