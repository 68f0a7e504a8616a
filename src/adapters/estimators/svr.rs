//! Epsilon-insensitive support vector regression with an RBF kernel.
//!
//! Fitting goes through `linfa_svm`; the solved dual coefficients, bias and
//! support vectors are then copied into plain serde data, so prediction is
//!
//! ```text
//! f(x) = Σ αᵢ · exp(−‖x − xᵢ‖² / w) − ρ
//! ```
//!
//! where `w` is the kernel width handed to the solver (`1 / γ`).

use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_training_data, FitError};

/// Coefficients at or below this magnitude do not contribute.
const SUPPORT_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvrParams {
    /// Box constraint on each dual coefficient
    pub c: f64,
    /// Width of the insensitive tube
    pub epsilon: f64,
    /// RBF coefficient; `None` uses `1 / (n_features * Var(X))`
    pub gamma: Option<f64>,
}

impl Default for SvrParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.1,
            gamma: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Svr {
    /// Gaussian kernel width, `1 / γ`
    kernel_width: f64,
    rho: f64,
    alpha: Vec<f64>,
    support_vectors: Vec<Vec<f64>>,
    n_features: usize,
}

/// `1 / (n_features * Var(X))` over every cell of `x`.
fn scale_gamma(x: &[Vec<f64>], n_features: usize) -> f64 {
    let count = (x.len() * n_features) as f64;
    let mean = x.iter().flatten().sum::<f64>() / count;
    let var = x.iter().flatten().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    if var > 0.0 {
        1.0 / (n_features as f64 * var)
    } else {
        1.0
    }
}

fn records(x: &[Vec<f64>], n_features: usize) -> Result<Array2<f64>, FitError> {
    Array2::from_shape_vec((x.len(), n_features), x.concat())
        .map_err(|e| FitError::Solve(e.to_string()))
}

/// Run the solver and return its model as-is.
fn solve(
    x: &[Vec<f64>],
    y: &[f64],
    kernel_width: f64,
    params: &SvrParams,
) -> Result<Svm<f64, f64>, FitError> {
    let n_features = check_training_data(x, y)?;
    let dataset = linfa::Dataset::new(records(x, n_features)?, Array1::from_vec(y.to_vec()));

    Svm::<f64, f64>::params()
        .c_svr(params.c, Some(params.epsilon))
        .gaussian_kernel(kernel_width)
        .fit(&dataset)
        .map_err(|e| FitError::Solve(e.to_string()))
}

impl Svr {
    /// # Errors
    /// Returns [`FitError`] if the data is empty or ragged, a parameter is
    /// out of range, or the solver fails.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &SvrParams) -> Result<Self, FitError> {
        let n_features = check_training_data(x, y)?;
        if !(params.c > 0.0) || params.epsilon < 0.0 {
            return Err(FitError::InvalidParams(format!(
                "SVR requires C > 0 and epsilon >= 0 (got C={}, epsilon={})",
                params.c, params.epsilon
            )));
        }

        let gamma = params.gamma.unwrap_or_else(|| scale_gamma(x, n_features));
        let kernel_width = 1.0 / gamma;
        let svm = solve(x, y, kernel_width, params)?;

        // The solver keeps one coefficient per training row.
        let (alpha, support_vectors): (Vec<f64>, Vec<Vec<f64>>) = svm
            .alpha
            .iter()
            .zip(x)
            .filter(|(a, _)| a.abs() > SUPPORT_EPS)
            .map(|(a, row)| (*a, row.clone()))
            .unzip();

        tracing::debug!(
            "SVR fitted: {} support vectors of {} rows (gamma={:.3e})",
            alpha.len(),
            x.len(),
            gamma
        );

        Ok(Self {
            kernel_width,
            rho: svm.rho,
            alpha,
            support_vectors,
            n_features,
        })
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn support_vector_count(&self) -> usize {
        self.support_vectors.len()
    }

    fn kernel(&self, a: &[f64], b: &[f64]) -> f64 {
        let dist: f64 = a.iter().zip(b).map(|(p, q)| (p - q).powi(2)).sum();
        (-dist / self.kernel_width).exp()
    }

    #[must_use]
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        if row.len() != self.n_features {
            return f64::NAN;
        }
        self.alpha
            .iter()
            .zip(&self.support_vectors)
            .map(|(a, sv)| a * self.kernel(sv, row))
            .sum::<f64>()
            - self.rho
    }
}
