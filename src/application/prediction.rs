//! Prediction service: score a soil sample and attach advice.
//!
//! This service coordinates:
//! - Input validation (form fields to [`SoilFeatures`])
//! - Model inference through the [`Regressor`] port
//! - Score rounding, clamping and status labelling
//! - Threshold-based recommendations

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    recommend, FertilityScore, SoilAssessment, SoilFeatures, ValidationError, FEATURE_COUNT,
};
use crate::ports::Regressor;

/// Error raised while producing a prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model {model} takes {got} features, expected {expected}")]
    Shape {
        model: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Model produced a non-finite output ({0})")]
    NonFinite(f64),
}

/// Service for scoring soil samples with a loaded model.
///
/// The model is shared read-only; cloning the service clones the `Arc`.
pub struct PredictionService<R>
where
    R: Regressor + ?Sized,
{
    model: Arc<R>,
}

impl<R: Regressor + ?Sized> Clone for PredictionService<R> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
        }
    }
}

impl<R> PredictionService<R>
where
    R: Regressor + ?Sized,
{
    /// Wrap a loaded model.
    ///
    /// # Errors
    /// Returns [`PredictionError::Shape`] if the model was not trained on the
    /// 14 soil features.
    pub fn new(model: Arc<R>) -> Result<Self, PredictionError> {
        if model.n_features() != FEATURE_COUNT {
            return Err(PredictionError::Shape {
                model: model.name(),
                expected: FEATURE_COUNT,
                got: model.n_features(),
            });
        }
        tracing::info!("Prediction service ready ({} model)", model.name());
        Ok(Self { model })
    }

    #[must_use]
    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Predict the fertility score for one sample.
    ///
    /// # Errors
    /// Returns [`PredictionError::NonFinite`] if the model output is NaN or
    /// infinite.
    pub fn predict(&self, features: &SoilFeatures) -> Result<FertilityScore, PredictionError> {
        let raw = self.model.predict_row(&features.to_array());
        let score = FertilityScore::from_raw(raw).ok_or(PredictionError::NonFinite(raw))?;
        tracing::debug!("Raw prediction {:.4} -> score {}", raw, score);
        Ok(score)
    }

    /// Predict and build the full assessment (status and advice).
    ///
    /// # Errors
    /// Returns error if prediction fails.
    pub fn assess(&self, features: SoilFeatures) -> Result<SoilAssessment, PredictionError> {
        let score = self.predict(&features)?;
        let recommendations = recommend(&features);
        let assessment = SoilAssessment::new(features, score, recommendations);

        tracing::info!(
            "Assessed sample: score={} status={} actions={}",
            assessment.score,
            assessment.status,
            assessment.recommendations.action_count()
        );
        Ok(assessment)
    }

    /// Validate submitted form fields, then assess.
    ///
    /// # Errors
    /// Returns [`PredictionError::Validation`] naming the first bad field.
    pub fn assess_form(
        &self,
        form: &HashMap<String, String>,
    ) -> Result<SoilAssessment, PredictionError> {
        let features = SoilFeatures::from_form(form).map_err(|e| {
            tracing::warn!("Rejected form submission: {}", e);
            e
        })?;
        self.assess(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::estimators::{LinearRegression, TrainedModel};
    use crate::domain::{SoilStatus, FEATURE_NAMES};
    use proptest::prelude::*;

    /// Returns a fixed value regardless of input.
    struct Constant(f64);

    impl Regressor for Constant {
        fn name(&self) -> &'static str {
            "Constant"
        }
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }
        fn predict_row(&self, _row: &[f64]) -> f64 {
            self.0
        }
    }

    fn service(value: f64) -> PredictionService<Constant> {
        PredictionService::new(Arc::new(Constant(value))).expect("service")
    }

    fn full_form() -> HashMap<String, String> {
        FEATURE_NAMES
            .iter()
            .map(|name| ((*name).to_string(), "100".to_string()))
            .collect()
    }

    #[test]
    fn test_score_is_rounded_and_labelled() {
        let assessment = service(91.46)
            .assess(SoilFeatures::default())
            .expect("assess");
        assert!((assessment.score.value() - 91.5).abs() < 1e-9);
        assert_eq!(assessment.status, SoilStatus::VeryGood);
        assert_eq!(assessment.recommendations.len(), 5);
    }

    #[test]
    fn test_out_of_range_output_is_clamped() {
        let svc = service(250.0);
        let score = svc.predict(&SoilFeatures::default()).expect("predict");
        assert!((score.value() - 100.0).abs() < f64::EPSILON);
        assert_eq!(score.status(), SoilStatus::UltraFertile);
    }

    #[test]
    fn test_nan_output_is_an_error() {
        let err = service(f64::NAN)
            .predict(&SoilFeatures::default())
            .expect_err("nan");
        assert!(matches!(err, PredictionError::NonFinite(_)));
    }

    #[test]
    fn test_missing_form_field_names_it() {
        let mut form = full_form();
        form.remove("pH");
        let err = service(50.0).assess_form(&form).expect_err("missing pH");
        match err {
            PredictionError::Validation(v) => assert_eq!(v.field(), Some("pH")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_form_submission_assesses() {
        let assessment = service(60.0).assess_form(&full_form()).expect("assess");
        assert_eq!(assessment.status, SoilStatus::NeedsImprovement);
        assert!((assessment.features.ph - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wrong_width_model_is_rejected() {
        let model = TrainedModel::LinearRegression(LinearRegression::from_parts(0.0, vec![1.0; 3]));
        assert!(matches!(
            PredictionService::new(Arc::new(model)),
            Err(PredictionError::Shape { got: 3, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_score_stays_in_range(
            values in prop::collection::vec(-1.0e6f64..1.0e6, FEATURE_COUNT)
        ) {
            let model = TrainedModel::LinearRegression(LinearRegression::from_parts(
                12.5,
                (0..FEATURE_COUNT).map(|i| i as f64 - 6.5).collect(),
            ));
            let svc = PredictionService::new(Arc::new(model)).expect("service");
            let features = SoilFeatures::from_vec(&values).expect("14 values");
            let score = svc.predict(&features).expect("finite").value();
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
