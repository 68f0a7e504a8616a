//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and implement strict validation.

mod fertility;
mod recommendation;
mod report;
mod soil;

pub use fertility::{FertilityScore, SoilAssessment, SoilStatus};
pub use recommendation::{recommend, Advice, RecommendationSet, Severity, SoilProperty};
pub use report::{SoilReport, NOT_AVAILABLE};
pub use soil::{SoilFeatures, ValidationError, FEATURE_COUNT, FEATURE_NAMES};
