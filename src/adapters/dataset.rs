//! CSV dataset loading for the trainer.
//!
//! The training sheet has one column per measurement plus the target column.
//! Feature columns are matched by name and reordered into model order, so
//! the CSV may list them in any order and carry extra columns.

use std::io::Read;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::FEATURE_NAMES;

/// Target column of the original training sheet.
pub const DEFAULT_TARGET: &str = "Vegetation Cover";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column {column:?} not found (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Line {line}, column {column:?}: {value:?} is not a number")]
    NotNumeric {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Dataset has no rows")]
    Empty,

    #[error("Dataset needs at least 2 rows to split, got {0}")]
    TooSmall(usize),

    #[error("Test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),
}

/// Feature rows (model order) with their targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

/// Train/test partition of a [`Dataset`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// # Errors
    /// Returns [`DatasetError`] if the file cannot be read or parsed.
    pub fn from_csv_path(path: &Path, target: &str) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        let dataset = Self::from_csv_reader(file, target)?;
        tracing::info!(
            "Loaded {} rows from {:?} (target {:?})",
            dataset.len(),
            path,
            target
        );
        Ok(dataset)
    }

    /// # Errors
    /// Returns [`DatasetError`] if a required column is missing or a cell is
    /// not numeric.
    pub fn from_csv_reader<R: Read>(reader: R, target: &str) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn {
                    column: name.to_string(),
                    available: headers.clone(),
                })
        };
        let target_col = column(target)?;
        let feature_cols = FEATURE_NAMES
            .iter()
            .map(|name| column(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut dataset = Self::default();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let cell = |col: usize| -> Result<f64, DatasetError> {
                let raw = record.get(col).unwrap_or_default();
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DatasetError::NotNumeric {
                        line,
                        column: headers[col].clone(),
                        value: raw.to_string(),
                    })
            };

            let row = feature_cols
                .iter()
                .map(|&c| cell(c))
                .collect::<Result<Vec<_>, _>>()?;
            dataset.targets.push(cell(target_col)?);
            dataset.features.push(row);
        }

        if dataset.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(dataset)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn subset(&self, indices: &[usize]) -> Self {
        Self {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    /// Shuffle with a seeded generator and hold out `ceil(n * test_fraction)`
    /// rows for testing (at least one row on each side).
    ///
    /// # Errors
    /// Returns error if the fraction is outside `(0, 1)` or there are fewer
    /// than two rows.
    pub fn train_test_split(
        &self,
        test_fraction: f64,
        seed: u64,
    ) -> Result<TrainTestSplit, DatasetError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(DatasetError::InvalidFraction(test_fraction));
        }
        let n = self.len();
        if n < 2 {
            return Err(DatasetError::TooSmall(n));
        }

        let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test_idx, train_idx) = indices.split_at(n_test);
        Ok(TrainTestSplit {
            train: self.subset(train_idx),
            test: self.subset(test_idx),
        })
    }
}
