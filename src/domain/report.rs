//! Downloadable soil report contents.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Placeholder for a value the caller did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Everything printed on a soil fertility report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilReport {
    /// Score as displayed, without the percent sign
    pub score: String,

    /// Status label
    pub status: String,

    /// Plain-text advice lines, one bullet each
    pub actions: Vec<String>,

    pub generated_at: DateTime<Local>,
}

impl SoilReport {
    pub const TITLE: &'static str = "Soil Fertility Analysis Report";
    pub const CLOSING: &'static str = "Thank you for using Soil Fertility Predict!";
    pub const CREDIT: &'static str = "Developed by Nitin & Team";

    #[must_use]
    pub fn new(score: Option<&str>, status: Option<&str>, actions: Vec<String>) -> Self {
        Self::at(score, status, actions, Local::now())
    }

    /// Build a report with an explicit timestamp.
    #[must_use]
    pub fn at(
        score: Option<&str>,
        status: Option<&str>,
        actions: Vec<String>,
        generated_at: DateTime<Local>,
    ) -> Self {
        let or_na = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };
        Self {
            score: or_na(score),
            status: or_na(status),
            actions,
            generated_at,
        }
    }

    /// e.g. `Generated on: 05 March 2026, 02:30 PM`
    #[must_use]
    pub fn generated_line(&self) -> String {
        format!(
            "Generated on: {}",
            self.generated_at.format("%d %B %Y, %I:%M %p")
        )
    }

    #[must_use]
    pub fn score_line(&self) -> String {
        format!("Predicted Fertility Score: {}%", self.score)
    }

    #[must_use]
    pub fn status_line(&self) -> String {
        format!("Soil Status: {}", self.status)
    }

    /// Italic lines printed after the actions.
    #[must_use]
    pub fn closing_lines(&self) -> [&'static str; 2] {
        [Self::CLOSING, Self::CREDIT]
    }

    /// Attachment name, e.g. `Soil_Report_05032026_1430.pdf`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("Soil_Report_{}.pdf", self.generated_at.format("%d%m%Y_%H%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 5, 14, 30, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn test_lines_and_file_name() {
        let report = SoilReport::at(
            Some("91.4"),
            Some("Very Good"),
            vec!["Apply DAP: 50–100 kg/ha".into()],
            fixed_time(),
        );
        assert_eq!(report.score_line(), "Predicted Fertility Score: 91.4%");
        assert_eq!(report.status_line(), "Soil Status: Very Good");
        assert_eq!(report.generated_line(), "Generated on: 05 March 2026, 02:30 PM");
        assert_eq!(report.file_name(), "Soil_Report_05032026_1430.pdf");
        assert_eq!(
            report.closing_lines(),
            ["Thank you for using Soil Fertility Predict!", "Developed by Nitin & Team"]
        );
    }

    #[test]
    fn test_missing_values_render_as_na() {
        let report = SoilReport::at(None, Some("  "), Vec::new(), fixed_time());
        assert_eq!(report.score, NOT_AVAILABLE);
        assert_eq!(report.status, NOT_AVAILABLE);
    }
}
