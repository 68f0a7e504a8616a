//! Request handlers for the soil fertility pages.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use super::pages::{self, IndexView};
use super::AppState;

/// Prefix of every form error shown to the user.
const FORM_ERROR: &str = "Please fill all fields correctly!";

pub(crate) async fn index_handler() -> Html<String> {
    Html(pages::index_page(&IndexView::default()))
}

pub(crate) async fn predict_handler(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Html<String> {
    let html = match state.predictor.assess_form(&form) {
        Ok(assessment) => pages::index_page(&IndexView {
            submitted: Some(&form),
            assessment: Some(&assessment),
            error: None,
        }),
        Err(e) => {
            tracing::warn!("Prediction request failed: {}", e);
            pages::index_page(&IndexView {
                submitted: Some(&form),
                assessment: None,
                error: Some(format!("{FORM_ERROR} ({e})")),
            })
        }
    };
    Html(html)
}

pub(crate) async fn test_cases_handler() -> Html<String> {
    Html(pages::test_cases_page())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    pred: Option<String>,
    status: Option<String>,
    rec: Option<String>,
}

fn pdf_failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate PDF").into_response()
}

pub(crate) async fn download_report_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let reports = state.reports.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let report = reports.build(
            query.pred.as_deref(),
            query.status.as_deref(),
            query.rec.as_deref(),
        );
        reports.render(&report)
    })
    .await;

    match rendered {
        Ok(Ok(report)) => (
            [
                (header::CONTENT_TYPE, report.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", report.file_name),
                ),
            ],
            report.bytes,
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!("PDF error: {}", e);
            pdf_failure()
        }
        Err(e) => {
            tracing::error!("Report task failed: {}", e);
            pdf_failure()
        }
    }
}
