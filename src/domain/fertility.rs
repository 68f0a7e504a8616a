//! Fertility score and status types.
//!
//! Represents the output of the regression model after post-processing.

use serde::{Deserialize, Serialize};

use super::recommendation::RecommendationSet;
use super::soil::SoilFeatures;

/// Predicted fertility as a percentage.
///
/// Always rounded to one decimal place and within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct FertilityScore(f64);

impl FertilityScore {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Post-process a raw model output: round to one decimal, then clamp.
    ///
    /// Rounding is done on `raw * 10` with halves going away from zero, so a
    /// value such as `55.05` becomes `55.1`. Rounding the exact binary value
    /// instead would give `55.0`; the two only disagree on such ties.
    ///
    /// Returns `None` for non-finite output.
    #[must_use]
    pub fn from_raw(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let rounded = (raw * 10.0).round() / 10.0;
        Some(Self(rounded.clamp(Self::MIN, Self::MAX)))
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Status band for this score.
    #[must_use]
    pub fn status(&self) -> SoilStatus {
        SoilStatus::from_score(self.0)
    }
}

impl std::fmt::Display for FertilityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Soil status classification derived from the fertility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilStatus {
    /// Score of 98 and above
    UltraFertile,
    /// 88 up to 98
    VeryGood,
    /// 75 up to 88
    Average,
    /// 55 up to 75
    NeedsImprovement,
    /// Below 55
    Poor,
}

impl SoilStatus {
    /// Classify a score. Breakpoints are inclusive lower bounds.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 98.0 {
            Self::UltraFertile
        } else if score >= 88.0 {
            Self::VeryGood
        } else if score >= 75.0 {
            Self::Average
        } else if score >= 55.0 {
            Self::NeedsImprovement
        } else {
            Self::Poor
        }
    }

    /// Label shown on the page and in the report.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::UltraFertile => "Ultra-Fertile",
            Self::VeryGood => "Very Good",
            Self::Average => "Average Soil",
            Self::NeedsImprovement => "Needs Improvement",
            Self::Poor => "Poor / Deficient",
        }
    }

    /// Text colour class for the status badge.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::UltraFertile => "text-emerald-600",
            Self::VeryGood => "text-green-500",
            Self::Average => "text-yellow-500",
            Self::NeedsImprovement => "text-orange-500",
            Self::Poor => "text-red-600",
        }
    }
}

impl std::fmt::Display for SoilStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete result of assessing one soil sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilAssessment {
    /// The submitted measurements
    pub features: SoilFeatures,

    pub score: FertilityScore,

    pub status: SoilStatus,

    /// Fertilizer and amendment advice
    pub recommendations: RecommendationSet,

    /// Timestamp of assessment
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SoilAssessment {
    /// Create an assessment from a score; status is derived from it.
    #[must_use]
    pub fn new(
        features: SoilFeatures,
        score: FertilityScore,
        recommendations: RecommendationSet,
    ) -> Self {
        Self {
            features,
            status: score.status(),
            score,
            recommendations,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_rounds_then_clamps() {
        let s = FertilityScore::from_raw(87.349).expect("finite");
        assert!((s.value() - 87.3).abs() < 1e-9);
        let s = FertilityScore::from_raw(87.35001).expect("finite");
        assert!((s.value() - 87.4).abs() < 1e-9);

        assert_eq!(FertilityScore::from_raw(104.2).map(|s| s.value()), Some(100.0));
        assert_eq!(FertilityScore::from_raw(-3.0).map(|s| s.value()), Some(0.0));
        assert_eq!(FertilityScore::from_raw(100.04).map(|s| s.value()), Some(100.0));
    }

    #[test]
    fn test_decimal_ties_round_away_from_zero() {
        let s = FertilityScore::from_raw(55.05).expect("finite");
        assert!((s.value() - 55.1).abs() < 1e-9);
        assert_eq!(s.status(), SoilStatus::NeedsImprovement);

        let s = FertilityScore::from_raw(0.15).expect("finite");
        assert!((s.value() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_output_is_rejected() {
        assert!(FertilityScore::from_raw(f64::NAN).is_none());
        assert!(FertilityScore::from_raw(f64::INFINITY).is_none());
    }

    #[test]
    fn test_status_at_and_below_each_breakpoint() {
        let cases = [
            (98.0, "Ultra-Fertile"),
            (97.9, "Very Good"),
            (88.0, "Very Good"),
            (87.9, "Average Soil"),
            (75.0, "Average Soil"),
            (74.9, "Needs Improvement"),
            (55.0, "Needs Improvement"),
            (54.9, "Poor / Deficient"),
            (0.0, "Poor / Deficient"),
            (100.0, "Ultra-Fertile"),
        ];
        for (score, label) in cases {
            assert_eq!(SoilStatus::from_score(score).label(), label, "score {score}");
        }
    }

    #[test]
    fn test_display_uses_one_decimal() {
        let s = FertilityScore::from_raw(92.0).expect("finite");
        assert_eq!(s.to_string(), "92.0");
        assert_eq!(s.status().to_string(), "Very Good");
    }
}
