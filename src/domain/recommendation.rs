//! Threshold-based fertilizer and amendment recommendations.
//!
//! Each soil property falls into a band; the band selects a fixed piece of
//! advice and a severity tier used for display styling. Lower bounds are
//! inclusive: a value exactly on a boundary belongs to the upper band.

use serde::{Deserialize, Serialize};

use super::soil::SoilFeatures;

/// How urgently a property needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Deficient or out of range, act now
    Critical,
    /// Below optimum, top up
    Moderate,
    /// No action needed
    Ok,
}

impl Severity {
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Critical => "text-orange-500",
            Self::Moderate => "text-yellow-500",
            Self::Ok => "text-green-500",
        }
    }
}

/// Soil property an advice entry is about, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilProperty {
    Nitrogen,
    Phosphorus,
    Potassium,
    OrganicMatter,
    Ph,
}

impl SoilProperty {
    pub const ALL: [Self; 5] = [
        Self::Nitrogen,
        Self::Phosphorus,
        Self::Potassium,
        Self::OrganicMatter,
        Self::Ph,
    ];
}

/// One line of advice.
///
/// The text is split around an optional highlighted product name so the
/// page can render it in bold while the report prints it plainly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub property: SoilProperty,
    pub severity: Severity,
    /// Text before the product name
    pub lead: String,
    /// Product name, highlighted when rendered
    pub product: Option<String>,
    /// Text after the product name
    pub detail: String,
}

impl Advice {
    fn new(
        property: SoilProperty,
        severity: Severity,
        lead: &str,
        product: Option<&str>,
        detail: &str,
    ) -> Self {
        Self {
            property,
            severity,
            lead: lead.to_string(),
            product: product.map(str::to_string),
            detail: detail.to_string(),
        }
    }

    fn apply(property: SoilProperty, severity: Severity, product: &str, detail: &str) -> Self {
        Self::new(property, severity, "Apply ", Some(product), detail)
    }

    fn add(property: SoilProperty, severity: Severity, product: &str, detail: &str) -> Self {
        Self::new(property, severity, "Add ", Some(product), detail)
    }

    fn fine(property: SoilProperty, text: &str) -> Self {
        Self::new(property, Severity::Ok, text, None, "")
    }

    /// The advice as a single plain sentence.
    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "{}{}{}",
            self.lead,
            self.product.as_deref().unwrap_or_default(),
            self.detail
        )
    }
}

/// Advice for all five properties, always in [`SoilProperty::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    entries: Vec<Advice>,
}

impl RecommendationSet {
    /// Closing line shown under the advice list.
    pub const TARGET_LINE: &'static str = "Target: Ultra-Fertile Soil in One Season!";

    #[must_use]
    pub fn entries(&self) -> &[Advice] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advice for a given property.
    #[must_use]
    pub fn get(&self, property: SoilProperty) -> Option<&Advice> {
        self.entries.iter().find(|a| a.property == property)
    }

    /// Number of entries needing action.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|a| a.severity != Severity::Ok)
            .count()
    }
}

/// Map a soil sample to fertilizer and amendment advice.
#[must_use]
pub fn recommend(features: &SoilFeatures) -> RecommendationSet {
    use SoilProperty::{Nitrogen, OrganicMatter, Ph, Phosphorus, Potassium};

    let n = features.nitrogen();
    let nitrogen = if n < 50.0 {
        Advice::apply(Nitrogen, Severity::Critical, "Urea (46% N)", ": 150–200 kg/ha")
    } else if n < 80.0 {
        Advice::apply(Nitrogen, Severity::Moderate, "Urea", ": 80–120 kg/ha")
    } else {
        Advice::fine(Nitrogen, "Nitrogen level is sufficient")
    };

    let phosphorus = if features.p < 80.0 {
        Advice::apply(Phosphorus, Severity::Critical, "DAP (18-46-0)", ": 100–180 kg/ha")
    } else if features.p < 140.0 {
        Advice::apply(Phosphorus, Severity::Moderate, "DAP", ": 50–100 kg/ha")
    } else {
        Advice::fine(Phosphorus, "Phosphorus is adequate")
    };

    let potassium = if features.k < 150.0 {
        Advice::apply(Potassium, Severity::Critical, "MOP (60% K)", ": 100–150 kg/ha")
    } else if features.k < 220.0 {
        Advice::apply(Potassium, Severity::Moderate, "MOP", ": 50–80 kg/ha")
    } else {
        Advice::fine(Potassium, "Potassium is sufficient")
    };

    let organic_matter = if features.om < 3.0 {
        Advice::add(OrganicMatter, Severity::Critical, "FYM/Compost", ": 10–15 tons/ha")
    } else if features.om < 5.0 {
        Advice::add(OrganicMatter, Severity::Moderate, "FYM", ": 5–8 tons/ha")
    } else {
        Advice::fine(OrganicMatter, "Organic Matter is good")
    };

    let ph = if features.ph < 6.0 {
        Advice::apply(Ph, Severity::Critical, "Lime", ": 2–5 tons/ha to correct acidity")
    } else if features.ph > 7.8 {
        Advice::apply(Ph, Severity::Critical, "Gypsum/Sulfur", " to reduce alkalinity")
    } else {
        Advice::fine(Ph, "Soil pH is ideal (6.0–7.8)")
    };

    RecommendationSet {
        entries: vec![nitrogen, phosphorus, potassium, organic_matter, ph],
    }
}
