//! Server-rendered HTML pages.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::adapters::markup::escape_html;
use crate::domain::{RecommendationSet, SoilAssessment, FEATURE_COUNT, FEATURE_NAMES};

/// Form labels, in model order.
const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Nitrate (NO3)",
    "Ammonium (NH4)",
    "Phosphorus (P)",
    "Potassium (K)",
    "Sulphate (SO4)",
    "Boron (B)",
    "Organic Matter (OM %)",
    "pH",
    "Zinc (Zn)",
    "Copper (Cu)",
    "Iron (Fe)",
    "Calcium (Ca)",
    "Magnesium (Mg)",
    "Sodium (Na)",
];

/// A ready-made input for the test cases page.
pub struct SampleCase {
    pub name: &'static str,
    pub description: &'static str,
    /// Values in model order
    pub values: [f64; FEATURE_COUNT],
}

pub const SAMPLE_CASES: [SampleCase; 5] = [
    SampleCase {
        name: "Rich loam",
        description: "Well-fed field with every nutrient above its band",
        values: [
            60.0, 40.0, 160.0, 250.0, 25.0, 1.2, 5.5, 6.8, 2.1, 1.5, 18.0, 1800.0, 320.0, 45.0,
        ],
    },
    SampleCase {
        name: "Balanced field",
        description: "Mid-range nutrients, organic matter slightly low",
        values: [
            50.0, 35.0, 145.0, 230.0, 20.0, 1.0, 4.2, 7.1, 1.6, 1.1, 14.0, 1500.0, 280.0, 60.0,
        ],
    },
    SampleCase {
        name: "Nitrogen-starved sand",
        description: "Light soil with low nitrogen and organic matter",
        values: [
            20.0, 15.0, 90.0, 160.0, 12.0, 0.5, 2.1, 6.2, 0.8, 0.6, 9.0, 900.0, 150.0, 30.0,
        ],
    },
    SampleCase {
        name: "Acidic upland",
        description: "Low pH with poor phosphorus and potassium",
        values: [
            45.0, 30.0, 60.0, 120.0, 18.0, 0.4, 3.8, 5.2, 1.0, 0.9, 35.0, 600.0, 110.0, 20.0,
        ],
    },
    SampleCase {
        name: "Alkaline saline",
        description: "High pH and sodium, depleted organic matter",
        values: [
            38.0, 22.0, 110.0, 300.0, 40.0, 2.5, 1.5, 8.4, 0.6, 0.7, 5.0, 3200.0, 450.0, 380.0,
        ],
    },
];

/// What the index page shows besides the form.
#[derive(Default)]
pub struct IndexView<'a> {
    /// Previously submitted values, echoed back into the inputs
    pub submitted: Option<&'a HashMap<String, String>>,
    pub assessment: Option<&'a SoilAssessment>,
    pub error: Option<String>,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{}</title><script src=\"https://cdn.tailwindcss.com\"></script></head>\
<body class=\"bg-slate-50 text-slate-800\"><main class=\"max-w-4xl mx-auto p-6\">\
<nav class=\"mb-6 space-x-4\"><a class=\"text-emerald-700\" href=\"/\">Predict</a>\
<a class=\"text-emerald-700\" href=\"/test_cases\">Test cases</a></nav>{}</main></body></html>",
        escape_html(title),
        body
    )
}

/// Advice as an HTML list, ending with the target line.
///
/// This markup is also what the report link carries back to the server.
#[must_use]
pub fn recommendation_markup(recommendations: &RecommendationSet) -> String {
    let mut out = String::from("<ul class='space-y-4 text-lg'>");
    for advice in recommendations.entries() {
        let _ = write!(
            out,
            "<li class='{}'>{}",
            advice.severity.css_class(),
            escape_html(&advice.lead)
        );
        if let Some(product) = &advice.product {
            let _ = write!(out, "<strong>{}</strong>", escape_html(product));
        }
        let _ = write!(out, "{}</li>", escape_html(&advice.detail));
    }
    let _ = write!(
        out,
        "<li class='text-emerald-600 font-bold mt-6'>{}</li></ul>",
        RecommendationSet::TARGET_LINE
    );
    out
}

/// `/download_report` URL carrying the displayed results.
#[must_use]
pub fn report_link(score: &str, status: &str, recommendations: &str) -> String {
    match serde_urlencoded::to_string(&[
        ("pred", score),
        ("status", status),
        ("rec", recommendations),
    ]) {
        Ok(query) => format!("/download_report?{query}"),
        Err(e) => {
            tracing::warn!("Failed to encode report link: {}", e);
            "/download_report".to_string()
        }
    }
}

fn form_inputs(submitted: Option<&HashMap<String, String>>) -> String {
    let mut out = String::new();
    for (name, label) in FEATURE_NAMES.iter().zip(FEATURE_LABELS) {
        let value = submitted
            .and_then(|form| form.get(*name))
            .map(|v| escape_html(v))
            .unwrap_or_default();
        let _ = write!(
            out,
            "<label class=\"block\"><span class=\"text-sm\">{label}</span>\
<input class=\"w-full border rounded p-2\" type=\"number\" step=\"any\" name=\"{name}\" value=\"{value}\" required></label>"
        );
    }
    out
}

fn result_section(assessment: &SoilAssessment) -> String {
    let score = assessment.score.to_string();
    let status = assessment.status.label();
    let markup = recommendation_markup(&assessment.recommendations);
    let link = report_link(&score, status, &markup);
    format!(
        "<section class=\"mt-8 p-6 bg-white rounded shadow\">\
<h2 class=\"text-2xl font-bold\">Predicted Fertility Score: {score}%</h2>\
<p class=\"text-xl mt-2\">Soil Status: <span class=\"font-bold {}\">{status}</span></p>\
<h3 class=\"text-lg font-semibold mt-6 mb-2\">Recommended Actions</h3>{markup}\
<a class=\"inline-block mt-6 px-4 py-2 bg-emerald-600 text-white rounded\" href=\"{}\">Download PDF Report</a>\
</section>",
        assessment.status.css_class(),
        escape_html(&link)
    )
}

#[must_use]
pub fn index_page(view: &IndexView<'_>) -> String {
    let mut body = String::from(
        "<h1 class=\"text-3xl font-bold mb-4\">Soil Fertility Predictor</h1>\
<p class=\"mb-6\">Enter the lab values of a soil sample to estimate its fertility.</p>",
    );
    if let Some(error) = &view.error {
        let _ = write!(
            body,
            "<p class=\"mb-4 p-3 bg-red-100 text-red-700 rounded\">{}</p>",
            escape_html(error)
        );
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"/predict\" class=\"grid grid-cols-2 gap-4\">{}\
<button class=\"col-span-2 mt-2 px-4 py-2 bg-emerald-600 text-white rounded\" type=\"submit\">Predict</button></form>",
        form_inputs(view.submitted)
    );
    if let Some(assessment) = view.assessment {
        body.push_str(&result_section(assessment));
    }
    layout("Soil Fertility Predictor", &body)
}

#[must_use]
pub fn test_cases_page() -> String {
    let mut body = String::from(
        "<h1 class=\"text-3xl font-bold mb-4\">Sample Test Cases</h1>\
<p class=\"mb-6\">Each sample submits its values to the predictor.</p>",
    );
    for case in &SAMPLE_CASES {
        let _ = write!(
            body,
            "<section class=\"mb-6 p-4 bg-white rounded shadow\"><h2 class=\"text-xl font-bold\">{}</h2>\
<p class=\"mb-2\">{}</p><form method=\"post\" action=\"/predict\"><table class=\"text-sm mb-2\">",
            escape_html(case.name),
            escape_html(case.description)
        );
        for (name, value) in FEATURE_NAMES.iter().zip(case.values) {
            let _ = write!(
                body,
                "<tr><td class=\"pr-4\">{name}</td><td>{value}\
<input type=\"hidden\" name=\"{name}\" value=\"{value}\"></td></tr>"
            );
        }
        body.push_str(
            "</table><button class=\"px-3 py-1 bg-emerald-600 text-white rounded\" type=\"submit\">Try it</button></form></section>",
        );
    }
    layout("Sample Test Cases", &body)
}
