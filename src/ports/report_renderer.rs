//! Report renderer port: Trait for turning a report into a document.
//!
//! This trait abstracts the PDF library (printpdf) from the report service.

use crate::domain::SoilReport;

/// Error raised while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to build document: {0}")]
    Render(String),

    #[error("Failed to encode document: {0}")]
    Encode(String),
}

/// Trait for report output formats.
pub trait ReportRenderer: Send + Sync {
    /// MIME type of the rendered bytes.
    fn content_type(&self) -> &'static str;

    /// Render the report into an in-memory document.
    ///
    /// # Errors
    /// Returns [`ReportError`] if the document cannot be built; no partial
    /// output is returned.
    fn render(&self, report: &SoilReport) -> Result<Vec<u8>, ReportError>;
}
