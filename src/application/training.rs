//! Training service: fit every candidate estimator and keep the best.
//!
//! Candidates are ranked by R² on a single held-out split. The winner must
//! beat an R² of zero; ties keep the earlier candidate.

use std::path::PathBuf;

use crate::adapters::estimators::{r2_score, EstimatorKind, FitError};
use crate::adapters::{
    Dataset, DatasetError, ModelArtifact, ModelError, ModelStore, DEFAULT_TARGET,
};
use crate::ports::Regressor;

/// Error raised by a training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Failed to fit {estimator}: {source}")]
    Fit {
        estimator: EstimatorKind,
        #[source]
        source: FitError,
    },

    #[error("No candidate reached R² > 0 (best: {best})")]
    NoUsableModel { best: String },

    #[error("Model store error: {0}")]
    Store(#[from] ModelError),
}

/// Settings for a training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// CSV file with a header row
    pub data_path: PathBuf,
    /// Directory receiving the model and manifest
    pub model_dir: PathBuf,
    pub target: String,
    /// Seed for the split and for every estimator
    pub seed: u64,
    pub test_fraction: f64,
    /// Evaluated in order; earlier wins a tie
    pub candidates: Vec<EstimatorKind>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data").join("processed_data_set.csv"),
            model_dir: PathBuf::from("models"),
            target: DEFAULT_TARGET.to_string(),
            seed: 42,
            test_fraction: 0.2,
            candidates: EstimatorKind::ALL.to_vec(),
        }
    }
}

/// Held-out score of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    pub estimator: EstimatorKind,
    pub r2: f64,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub scores: Vec<CandidateScore>,
    pub best: CandidateScore,
    pub n_train: usize,
    pub n_test: usize,
}

/// Index of the first candidate with the highest R², if any beats zero.
#[must_use]
pub fn select_best(scores: &[CandidateScore]) -> Option<usize> {
    let mut best = None;
    let mut best_r2 = 0.0;
    for (i, score) in scores.iter().enumerate() {
        if score.r2 > best_r2 {
            best_r2 = score.r2;
            best = Some(i);
        }
    }
    best
}

/// Service running the train/evaluate/persist pipeline.
pub struct TrainingService {
    config: TrainConfig,
    store: ModelStore,
}

impl TrainingService {
    #[must_use]
    pub fn new(config: TrainConfig) -> Self {
        let store = ModelStore::new(config.model_dir.clone());
        Self { config, store }
    }

    /// Fit every candidate on `dataset` and return the winning artifact.
    ///
    /// # Errors
    /// Returns error if the split or any fit fails, or no candidate beats an
    /// R² of zero.
    pub fn train(
        &self,
        dataset: &Dataset,
    ) -> Result<(ModelArtifact, TrainingReport), TrainingError> {
        let split = dataset.train_test_split(self.config.test_fraction, self.config.seed)?;
        tracing::info!(
            "Training {} candidates on {} rows, testing on {}",
            self.config.candidates.len(),
            split.train.len(),
            split.test.len()
        );

        let mut scores = Vec::with_capacity(self.config.candidates.len());
        let mut models = Vec::with_capacity(self.config.candidates.len());
        for &estimator in &self.config.candidates {
            let model = estimator
                .fit(&split.train.features, &split.train.targets, self.config.seed)
                .map_err(|source| TrainingError::Fit { estimator, source })?;
            let r2 = r2_score(&split.test.targets, &model.predict(&split.test.features));
            tracing::info!("{}: R² = {:.4}", estimator, r2);

            scores.push(CandidateScore { estimator, r2 });
            models.push(model);
        }

        let index = select_best(&scores).ok_or_else(|| TrainingError::NoUsableModel {
            best: scores
                .iter()
                .max_by(|a, b| a.r2.total_cmp(&b.r2))
                .map_or_else(
                    || "none".to_string(),
                    |s| format!("{} at {:.4}", s.estimator, s.r2),
                ),
        })?;

        let best = scores[index];
        let model = models.swap_remove(index);

        tracing::info!("Best model: {} (R² = {:.4})", best.estimator, best.r2);
        tracing::info!("Selection uses plain R² on one fixed split; no cross-validation");

        let artifact = ModelArtifact::new(model, best.r2, split.train.len(), split.test.len());
        let report = TrainingReport {
            scores,
            best,
            n_train: split.train.len(),
            n_test: split.test.len(),
        };
        Ok((artifact, report))
    }

    /// Load the configured CSV, train, and persist the winner.
    ///
    /// # Errors
    /// Returns error if loading, training or saving fails.
    pub fn run(&self) -> Result<TrainingReport, TrainingError> {
        let dataset = Dataset::from_csv_path(&self.config.data_path, &self.config.target)?;
        let (artifact, report) = self.train(&dataset)?;
        self.store.save(&artifact)?;
        Ok(report)
    }
}
