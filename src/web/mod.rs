//! HTTP surface: axum router over the prediction and report services.
//!
//! Routes:
//! - `GET /`: input form
//! - `POST /`, `POST /predict`: form submission with results
//! - `GET /test_cases`: sample inputs
//! - `GET /download_report?pred=&status=&rec=`: PDF attachment

mod handlers;
pub mod pages;

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::adapters::{ModelStore, PdfReportRenderer};
use crate::application::{PredictionService, ReportService};
use crate::ports::{Regressor, ReportRenderer};

/// Form posts carry 14 short numbers.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub predictor: PredictionService<dyn Regressor>,
    pub reports: ReportService<dyn ReportRenderer>,
}

impl AppState {
    #[must_use]
    pub fn new(
        predictor: PredictionService<dyn Regressor>,
        reports: ReportService<dyn ReportRenderer>,
    ) -> Self {
        Self { predictor, reports }
    }
}

/// Load the persisted model from `model_dir` and wire the services.
///
/// # Errors
/// Returns error if the model is missing, fails verification, or does not
/// take the 14 soil features.
pub fn load_state(model_dir: &Path) -> crate::Result<AppState> {
    let artifact = ModelStore::new(model_dir).load()?;
    let model: Arc<dyn Regressor> = Arc::new(artifact.model);
    let renderer: Arc<dyn ReportRenderer> = Arc::new(PdfReportRenderer);
    Ok(AppState::new(
        PredictionService::new(model)?,
        ReportService::new(renderer),
    ))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::index_handler).post(handlers::predict_handler),
        )
        .route("/predict", post(handlers::predict_handler))
        .route("/test_cases", get(handlers::test_cases_handler))
        .route("/download_report", get(handlers::download_report_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::estimators::{LinearRegression, TrainedModel};
    use crate::adapters::{ModelArtifact, ModelError};
    use crate::domain::{SoilReport, FEATURE_COUNT, FEATURE_NAMES};
    use crate::ports::ReportError;
    use crate::SoilsenseError;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct BrokenRenderer;

    impl ReportRenderer for BrokenRenderer {
        fn content_type(&self) -> &'static str {
            "application/pdf"
        }

        fn render(&self, _report: &SoilReport) -> Result<Vec<u8>, ReportError> {
            Err(ReportError::Encode("disk full".into()))
        }
    }

    fn state_with(renderer: Arc<dyn ReportRenderer>) -> AppState {
        let model: Arc<dyn Regressor> = Arc::new(TrainedModel::LinearRegression(
            LinearRegression::from_parts(40.0, vec![0.1; FEATURE_COUNT]),
        ));
        AppState::new(
            PredictionService::new(model).expect("predictor"),
            ReportService::new(renderer),
        )
    }

    fn app() -> Router {
        build_router(state_with(Arc::new(PdfReportRenderer)))
    }

    fn form_body(skip: Option<&str>) -> String {
        FEATURE_NAMES
            .iter()
            .filter(|name| Some(**name) != skip)
            .map(|name| format!("{name}=100"))
            .collect::<Vec<_>>()
            .join("&")
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn post_form(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request")
    }

    #[test]
    fn test_load_state_requires_model() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            load_state(temp.path()),
            Err(SoilsenseError::Model(ModelError::NotFound(_)))
        ));

        let model = TrainedModel::LinearRegression(LinearRegression::from_parts(
            50.0,
            vec![0.0; FEATURE_COUNT],
        ));
        ModelStore::new(temp.path())
            .save(&ModelArtifact::new(model, 0.9, 8, 2))
            .expect("save");
        let state = load_state(temp.path()).expect("state");
        assert_eq!(state.predictor.model_name(), "LinearRegression");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("name=\"NO3\""));
        assert!(html.contains("name=\"Na\""));
    }

    #[tokio::test]
    async fn test_predict_renders_score_and_advice() {
        for uri in ["/predict", "/"] {
            let response = app()
                .oneshot(post_form(uri, form_body(None)))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
            let html = body_text(response).await;
            // 40 + 0.1 * 14 * 100
            assert!(html.contains("Predicted Fertility Score: 100.0%"), "{uri}");
            assert!(html.contains("Ultra-Fertile"));
            assert!(html.contains("Target: Ultra-Fertile Soil in One Season!"));
            assert!(html.contains("/download_report?pred=100.0"));
        }
    }

    #[tokio::test]
    async fn test_missing_field_shows_inline_error() {
        let response = app()
            .oneshot(post_form("/predict", form_body(Some("pH"))))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Please fill all fields correctly! (pH is missing!)"));
        assert!(!html.contains("Predicted Fertility Score"));
    }

    #[tokio::test]
    async fn test_download_report_is_pdf_attachment() {
        let uri = "/download_report?pred=91.5&status=Very+Good&rec=%3Cli%3EApply+DAP%3C%2Fli%3E";
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("ascii header")
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"Soil_Report_"));
        assert!(disposition.ends_with(".pdf\""));

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_download_report_without_params_still_renders() {
        let response = app()
            .oneshot(
                Request::get("/download_report")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_render_failure_is_500() {
        let app = build_router(state_with(Arc::new(BrokenRenderer)));
        let response = app
            .oneshot(
                Request::get("/download_report?pred=50")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Failed to generate PDF");
    }

    #[tokio::test]
    async fn test_test_cases_page() {
        let response = app()
            .oneshot(Request::get("/test_cases").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Acidic upland"));
    }
}
