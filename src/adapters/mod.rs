//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `estimators`: the five regression models (nalgebra for least squares)
//! - `model_store`: JSON model artifact plus SHA-256 manifest
//! - `dataset`: CSV training data (csv)
//! - `pdf`: report rendering (printpdf)
//! - `markup`: HTML escaping and advice extraction (regex)

pub mod dataset;
pub mod estimators;
pub mod markup;
pub mod model_store;
pub mod pdf;

pub use dataset::{Dataset, DatasetError, TrainTestSplit, DEFAULT_TARGET};
pub use estimators::{EstimatorKind, FitError, TrainedModel};
pub use model_store::{ModelArtifact, ModelError, ModelStore};
pub use pdf::PdfReportRenderer;
