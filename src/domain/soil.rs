//! Soil sample types for fertility prediction.
//!
//! A sample is the 14 laboratory measurements the model was trained on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of chemical measurements in a soil sample.
pub const FEATURE_COUNT: usize = 14;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "NO3", "NH4", "P", "K", "SO4", "B", "OM", "pH", "Zn", "Cu", "Fe", "Ca", "Mg", "Na",
];

/// Error raised when a sample cannot be built from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is missing!")]
    Missing { field: &'static str },

    #[error("{field} must be a number (got {value:?})")]
    NotNumeric { field: &'static str, value: String },

    #[error("Expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },
}

impl ValidationError {
    /// Name of the offending field, when the error concerns a single field.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field } | Self::NotNumeric { field, .. } => Some(field),
            Self::FeatureCount { .. } => None,
        }
    }
}

/// Chemical profile of a soil sample.
///
/// Units follow the lab sheet the dataset came from: macro-nutrients in
/// kg/ha, organic matter in percent, pH unitless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SoilFeatures {
    /// Nitrate nitrogen
    pub no3: f64,
    /// Ammonium nitrogen
    pub nh4: f64,
    /// Phosphorus
    pub p: f64,
    /// Potassium
    pub k: f64,
    /// Sulfate
    pub so4: f64,
    /// Boron
    pub b: f64,
    /// Organic matter (%)
    pub om: f64,
    pub ph: f64,
    /// Zinc
    pub zn: f64,
    /// Copper
    pub cu: f64,
    /// Iron
    pub fe: f64,
    /// Calcium
    pub ca: f64,
    /// Magnesium
    pub mg: f64,
    /// Sodium
    pub na: f64,
}

impl SoilFeatures {
    /// Total available nitrogen (NO3 + NH4).
    #[must_use]
    pub fn nitrogen(&self) -> f64 {
        self.no3 + self.nh4
    }

    /// Convert features to a vector for model input.
    /// Order matches [`FEATURE_NAMES`].
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.no3, self.nh4, self.p, self.k, self.so4, self.b, self.om, self.ph, self.zn,
            self.cu, self.fe, self.ca, self.mg, self.na,
        ]
    }

    /// Create features from a vector in [`FEATURE_NAMES`] order.
    ///
    /// # Errors
    /// Returns error if the vector length is not 14.
    pub fn from_vec(v: &[f64]) -> Result<Self, ValidationError> {
        if v.len() != FEATURE_COUNT {
            return Err(ValidationError::FeatureCount {
                expected: FEATURE_COUNT,
                got: v.len(),
            });
        }

        Ok(Self {
            no3: v[0],
            nh4: v[1],
            p: v[2],
            k: v[3],
            so4: v[4],
            b: v[5],
            om: v[6],
            ph: v[7],
            zn: v[8],
            cu: v[9],
            fe: v[10],
            ca: v[11],
            mg: v[12],
            na: v[13],
        })
    }

    /// Build features from submitted form fields keyed by [`FEATURE_NAMES`].
    ///
    /// Fields are checked in model order, so the first offending field is
    /// the one reported.
    ///
    /// # Errors
    /// Returns [`ValidationError::Missing`] for an absent or blank field and
    /// [`ValidationError::NotNumeric`] for a value that is not a finite number.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut values = Vec::with_capacity(FEATURE_COUNT);
        for field in FEATURE_NAMES {
            let raw = form.get(field).map(|v| v.trim()).unwrap_or_default();
            if raw.is_empty() {
                return Err(ValidationError::Missing { field });
            }
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ValidationError::NotNumeric {
                    field,
                    value: raw.to_string(),
                })?;
            values.push(value);
        }
        Self::from_vec(&values)
    }
}
