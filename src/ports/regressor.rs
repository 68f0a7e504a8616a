//! Regressor port: Trait for fitted regression models.
//!
//! This trait abstracts the concrete estimator (forest, boosting, linear,
//! SVR) from the prediction service.

/// A fitted model mapping a feature row to a scalar.
///
/// Implementations are immutable after fitting and safe to share across
/// request handlers.
pub trait Regressor: Send + Sync {
    /// Short estimator name for logs and artifact metadata.
    fn name(&self) -> &'static str;

    /// Number of features the model expects per row.
    fn n_features(&self) -> usize;

    /// Predict the target for a single row.
    ///
    /// The caller guarantees `row.len() == self.n_features()`.
    fn predict_row(&self, row: &[f64]) -> f64;

    /// Predict every row in `rows`.
    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }
}
