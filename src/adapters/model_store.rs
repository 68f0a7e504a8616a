//! Model store: persistence of the trained estimator.
//!
//! A model directory holds two files:
//! - `best_soil_model.json`: the [`ModelArtifact`]
//! - `manifest.json`: SHA-256 digests of the files it binds
//!
//! Loading fails closed: a missing manifest, a digest mismatch or an artifact
//! for a different feature layout is an error, never a fallback.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::estimators::{EstimatorKind, TrainedModel};
use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::Regressor;

pub const MODEL_FILE: &str = "best_soil_model.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Artifact layout version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Error type for model persistence.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest does not bind {0}")]
    Unbound(String),

    #[error("Digest mismatch for {file}: manifest has {expected}, file has {actual}")]
    DigestMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("Corrupt model artifact: {0}")]
    Corrupt(String),

    #[error("Unsupported artifact version {0} (expected {})", FORMAT_VERSION)]
    UnsupportedVersion(u32),

    #[error("Model expects features {got:?}, this build uses {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
}

/// A trained model together with how it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub estimator: EstimatorKind,
    /// Input columns in model order
    pub feature_names: Vec<String>,
    /// R² on the held-out split
    pub r2: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub trained_at: DateTime<Utc>,
    pub model: TrainedModel,
}

impl ModelArtifact {
    /// Wrap a freshly trained model for persistence.
    #[must_use]
    pub fn new(model: TrainedModel, r2: f64, n_train: usize, n_test: usize) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            estimator: model.kind(),
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            r2,
            n_train,
            n_test,
            trained_at: Utc::now(),
            model,
        }
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion(self.format_version));
        }
        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(got, want)| got != want)
        {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
                got: self.feature_names.clone(),
            });
        }
        if self.model.n_features() != FEATURE_COUNT {
            return Err(ModelError::Corrupt(format!(
                "model takes {} inputs, expected {FEATURE_COUNT}",
                self.model.n_features()
            )));
        }
        if self.model.kind() != self.estimator {
            return Err(ModelError::Corrupt(format!(
                "header says {} but payload is {}",
                self.estimator,
                self.model.kind()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelManifest {
    version: u32,
    created_at: DateTime<Utc>,
    /// File name to lowercase hex SHA-256
    files: BTreeMap<String, String>,
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ModelError + '_ {
    move |source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelError::NotFound(path.to_path_buf())
        } else {
            ModelError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Filesystem location of a persisted model.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Persist an artifact and bind it in a fresh manifest.
    ///
    /// The model is written to a temporary file and renamed into place before
    /// the manifest is replaced, so a reader never sees a manifest pointing
    /// at a half-written model.
    ///
    /// # Errors
    /// Returns error if serialization or any filesystem write fails.
    pub fn save(&self, artifact: &ModelArtifact) -> Result<(), ModelError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let bytes = serde_json::to_vec(artifact)
            .map_err(|e| ModelError::Corrupt(format!("failed to serialize model: {e}")))?;

        let model_path = self.model_path();
        let tmp_path = self.dir.join(format!("{MODEL_FILE}.tmp"));
        fs::write(&tmp_path, &bytes).map_err(io_err(&tmp_path))?;
        fs::rename(&tmp_path, &model_path).map_err(io_err(&model_path))?;

        let manifest = ModelManifest {
            version: 1,
            created_at: Utc::now(),
            files: BTreeMap::from([(MODEL_FILE.to_string(), sha256_hex(&bytes))]),
        };
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| ModelError::Corrupt(format!("failed to serialize manifest: {e}")))?;
        let manifest_path = self.manifest_path();
        fs::write(&manifest_path, manifest_bytes).map_err(io_err(&manifest_path))?;

        tracing::info!(
            "Saved {} model to {:?} ({} bytes)",
            artifact.estimator,
            model_path,
            bytes.len()
        );
        Ok(())
    }

    /// Load and verify the persisted artifact.
    ///
    /// # Errors
    /// Returns [`ModelError`] if either file is missing, the digest does not
    /// match, the JSON does not parse, or the artifact does not fit the
    /// 14-feature layout.
    pub fn load(&self) -> Result<ModelArtifact, ModelError> {
        let manifest_path = self.manifest_path();
        let manifest_bytes = fs::read(&manifest_path).map_err(io_err(&manifest_path))?;
        let manifest: ModelManifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| ModelError::Corrupt(format!("invalid manifest: {e}")))?;

        let expected = manifest
            .files
            .get(MODEL_FILE)
            .ok_or_else(|| ModelError::Unbound(MODEL_FILE.to_string()))?;

        let model_path = self.model_path();
        let bytes = fs::read(&model_path).map_err(io_err(&model_path))?;
        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(ModelError::DigestMismatch {
                file: MODEL_FILE.to_string(),
                expected: expected.clone(),
                actual,
            });
        }

        let artifact: ModelArtifact = serde_json::from_slice(&bytes)
            .map_err(|e| ModelError::Corrupt(format!("invalid model JSON: {e}")))?;
        artifact.check()?;

        tracing::info!(
            "Loaded {} model from {:?} (R²={:.4}, trained {})",
            artifact.estimator,
            model_path,
            artifact.r2,
            artifact.trained_at.format("%Y-%m-%d %H:%M UTC")
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::estimators::LinearRegression;
    use tempfile::tempdir;

    fn artifact() -> ModelArtifact {
        let model = TrainedModel::LinearRegression(LinearRegression::from_parts(
            10.0,
            vec![0.5; FEATURE_COUNT],
        ));
        ModelArtifact::new(model, 0.81, 80, 20)
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().expect("tempdir");
        let store = ModelStore::new(temp.path().join("models"));
        store.save(&artifact()).expect("save");

        let loaded = store.load().expect("load");
        assert_eq!(loaded.estimator, EstimatorKind::LinearRegression);
        assert!((loaded.r2 - 0.81).abs() < 1e-12);
        assert!((loaded.model.predict_row(&[2.0; FEATURE_COUNT]) - 24.0).abs() < 1e-9);
        assert!(!temp.path().join("models").join("best_soil_model.json.tmp").exists());
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let temp = tempdir().expect("tempdir");
        let store = ModelStore::new(temp.path().join("nowhere"));
        assert!(matches!(store.load(), Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_tampered_model_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let store = ModelStore::new(temp.path());
        store.save(&artifact()).expect("save");

        let path = store.model_path();
        let text = fs::read_to_string(&path).expect("read model");
        fs::write(&path, text.replace("10.0", "99.0")).expect("tamper");

        assert!(matches!(
            store.load(),
            Err(ModelError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_model_without_manifest_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let store = ModelStore::new(temp.path());
        store.save(&artifact()).expect("save");
        fs::remove_file(store.manifest_path()).expect("remove manifest");

        assert!(matches!(store.load(), Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_wrong_feature_layout_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let store = ModelStore::new(temp.path());
        let mut bad = artifact();
        bad.feature_names.swap(0, 1);
        store.save(&bad).expect("save");

        assert!(matches!(
            store.load(),
            Err(ModelError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_garbage_json_is_corrupt() {
        let temp = tempdir().expect("tempdir");
        let store = ModelStore::new(temp.path());
        store.save(&artifact()).expect("save");

        let garbage = b"{not json";
        fs::write(store.model_path(), garbage).expect("write garbage");
        let manifest = ModelManifest {
            version: 1,
            created_at: Utc::now(),
            files: BTreeMap::from([(MODEL_FILE.to_string(), sha256_hex(garbage))]),
        };
        fs::write(
            store.manifest_path(),
            serde_json::to_vec(&manifest).expect("manifest json"),
        )
        .expect("write manifest");

        assert!(matches!(store.load(), Err(ModelError::Corrupt(_))));
    }
}
