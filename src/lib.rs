//! # Soilsense
//!
//! Soil fertility prediction from a 14-value chemical profile.
//!
//! This crate provides:
//! - A fertility score (0-100) from a trained regression model
//! - Threshold-based fertilizer and amendment advice
//! - A web form and a downloadable PDF report
//! - A trainer that picks the best of five estimators
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (SoilFeatures, FertilityScore, advice, report)
//! - `ports`: Trait definitions for models and report rendering
//! - `adapters`: Concrete implementations (estimators, model store, CSV, PDF)
//! - `application`: Use cases orchestrating domain and ports
//! - `web`: axum router and HTML pages

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod web;

pub use domain::{FertilityScore, SoilFeatures, SoilStatus};

/// Result type for Soilsense operations
pub type Result<T> = std::result::Result<T, SoilsenseError>;

/// Main error type for Soilsense
#[derive(Debug, thiserror::Error)]
pub enum SoilsenseError {
    #[error("Prediction failed: {0}")]
    Prediction(#[from] application::PredictionError),

    #[error("Model unavailable: {0}")]
    Model(#[from] adapters::ModelError),

    #[error("Training failed: {0}")]
    Training(#[from] application::TrainingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_keep_their_layer_in_the_message() {
        let err: SoilsenseError = application::TrainingError::NoUsableModel {
            best: "SVR at -0.1200".into(),
        }
        .into();
        assert!(matches!(err, SoilsenseError::Training(_)));
        assert!(err.to_string().starts_with("Training failed: No candidate"));

        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy");
        let err = SoilsenseError::from(io);
        assert_eq!(err.to_string(), "IO error: busy");
    }
}
