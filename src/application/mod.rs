//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod prediction;
mod report;
mod training;

pub use prediction::{PredictionError, PredictionService};
pub use report::{RenderedReport, ReportService};
pub use training::{
    select_best, CandidateScore, TrainConfig, TrainingError, TrainingReport, TrainingService,
};
