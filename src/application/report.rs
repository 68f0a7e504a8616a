//! Report service: turn the values echoed by the results page into a
//! downloadable document.

use std::sync::Arc;

use crate::adapters::markup::extract_actions;
use crate::domain::SoilReport;
use crate::ports::{ReportError, ReportRenderer};

/// A rendered report ready to be served.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Service for building soil reports.
pub struct ReportService<R>
where
    R: ReportRenderer + ?Sized,
{
    renderer: Arc<R>,
}

impl<R: ReportRenderer + ?Sized> Clone for ReportService<R> {
    fn clone(&self) -> Self {
        Self {
            renderer: Arc::clone(&self.renderer),
        }
    }
}

impl<R> ReportService<R>
where
    R: ReportRenderer + ?Sized,
{
    pub fn new(renderer: Arc<R>) -> Self {
        Self { renderer }
    }

    /// Assemble report contents from the query values.
    ///
    /// `recommendations` is the advice markup shown on the results page.
    #[must_use]
    pub fn build(
        &self,
        score: Option<&str>,
        status: Option<&str>,
        recommendations: Option<&str>,
    ) -> SoilReport {
        let actions = recommendations.map(extract_actions).unwrap_or_default();
        SoilReport::new(score, status, actions)
    }

    /// Render a report.
    ///
    /// # Errors
    /// Returns [`ReportError`] if the renderer fails.
    pub fn render(&self, report: &SoilReport) -> Result<RenderedReport, ReportError> {
        let bytes = self.renderer.render(report).map_err(|e| {
            tracing::error!("Report rendering failed: {}", e);
            e
        })?;
        tracing::info!(
            "Generated {} ({} actions, {} bytes)",
            report.file_name(),
            report.actions.len(),
            bytes.len()
        );
        Ok(RenderedReport {
            file_name: report.file_name(),
            content_type: self.renderer.content_type(),
            bytes,
        })
    }
}
