//! PDF report renderer backed by printpdf.
//!
//! Letter-size pages with 70pt margins and the built-in Helvetica family.
//! Built-in fonts only cover a Latin code page, so text is folded to ASCII
//! before it is placed.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rgb,
};

use crate::domain::SoilReport;
use crate::ports::{ReportError, ReportRenderer};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const PT_TO_MM: f32 = 25.4 / 72.0;
const MARGIN: f32 = 70.0 * PT_TO_MM;
const LINE_SPACING: f32 = 1.4;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;
const BULLET_SIZE: f32 = 11.0;
const BULLET_INDENT: f32 = 6.0;

/// Approximate characters per bullet line for Helvetica at [`BULLET_SIZE`].
const WRAP_COLUMNS: usize = 82;

const STATUS_GREEN: (f32, f32, f32) = (0.0, 0.5, 0.0);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

fn render_err(e: impl std::fmt::Debug) -> ReportError {
    ReportError::Render(format!("{e:?}"))
}

/// Fold text into what the built-in fonts can show.
fn to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2022}' | '\u{2212}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{00B2}' => '2',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            c if c.is_whitespace() => ' ',
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap. Words longer than `columns` are split.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.len() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(columns);
            lines.push(head.to_string());
            word = tail;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Writes lines top to bottom, starting a new page when the bottom margin
/// is reached.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Self {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        }
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn set_color(&self, (r, g, b): (f32, f32, f32)) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn line(
        &mut self,
        text: &str,
        size: f32,
        font: &IndirectFontRef,
        indent: f32,
        color: Option<(f32, f32, f32)>,
    ) {
        let height = size * LINE_SPACING * PT_TO_MM;
        if self.y - height < MARGIN {
            self.new_page();
        }
        self.y -= height;

        if let Some(color) = color {
            self.set_color(color);
        }
        self.layer
            .use_text(to_ascii(text), size, Mm(MARGIN + indent), Mm(self.y), font);
        if color.is_some() {
            self.set_color(BLACK);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Italic,
}

/// One placed line of the report.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    size: f32,
    face: Face,
    indent: f32,
    color: Option<(f32, f32, f32)>,
    /// Extra space above, in mm
    gap_before: f32,
}

impl Line {
    fn new(text: impl Into<String>, size: f32, face: Face) -> Self {
        Self {
            text: text.into(),
            size,
            face,
            indent: 0.0,
            color: None,
            gap_before: 0.0,
        }
    }

    fn gap(mut self, mm: f32) -> Self {
        self.gap_before = mm;
        self
    }
}

/// Lines of `report` in print order.
fn layout(report: &SoilReport) -> Vec<Line> {
    let mut lines = vec![
        Line::new(SoilReport::TITLE, TITLE_SIZE, Face::Bold),
        Line::new(report.generated_line(), BODY_SIZE - 2.0, Face::Italic).gap(4.0),
        Line::new(report.score_line(), BODY_SIZE + 2.0, Face::Bold).gap(6.0),
        Line {
            color: Some(STATUS_GREEN),
            ..Line::new(report.status_line(), BODY_SIZE + 2.0, Face::Bold)
        },
    ];

    if !report.actions.is_empty() {
        lines.push(Line::new("Recommended Actions:", BODY_SIZE + 1.0, Face::Bold).gap(6.0));
    }
    for action in &report.actions {
        for (i, part) in wrap(&to_ascii(action), WRAP_COLUMNS).iter().enumerate() {
            let text = if i == 0 {
                format!("- {part}")
            } else {
                format!("  {part}")
            };
            lines.push(Line {
                indent: BULLET_INDENT,
                ..Line::new(text, BULLET_SIZE, Face::Regular)
            });
        }
    }

    for (i, text) in report.closing_lines().into_iter().enumerate() {
        let line = Line::new(text, BODY_SIZE, Face::Italic);
        lines.push(if i == 0 { line.gap(8.0) } else { line });
    }
    lines
}

/// [`ReportRenderer`] producing `application/pdf` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer;

impl ReportRenderer for PdfReportRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, report: &SoilReport) -> Result<Vec<u8>, ReportError> {
        let mut writer = PageWriter::new(SoilReport::TITLE);
        let regular = writer
            .doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?;
        let bold = writer
            .doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?;
        let italic = writer
            .doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(render_err)?;

        for line in layout(report) {
            let font = match line.face {
                Face::Regular => &regular,
                Face::Bold => &bold,
                Face::Italic => &italic,
            };
            writer.gap(line.gap_before);
            writer.line(&line.text, line.size, font, line.indent, line.color);
        }

        let pages = writer.pages;
        let bytes = writer
            .doc
            .save_to_bytes()
            .map_err(|e| ReportError::Encode(format!("{e:?}")))?;
        tracing::debug!(
            "Rendered report: {} actions, {} page(s), {} bytes",
            report.actions.len(),
            pages,
            bytes.len()
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_pdf() {
        let report = SoilReport::new(
            Some("91.4"),
            Some("Very Good"),
            vec!["Apply Urea: 80–120 kg/ha".into(), "Soil pH is ideal".into()],
        );
        let bytes = PdfReportRenderer.render(&report).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_layout_ends_with_italic_thanks_and_credit() {
        let report = SoilReport::new(Some("80.0"), Some("Good"), vec!["Soil pH is ideal".into()]);
        let lines = layout(&report);
        let tail: Vec<(&str, Face)> = lines[lines.len() - 2..]
            .iter()
            .map(|l| (l.text.as_str(), l.face))
            .collect();
        assert_eq!(
            tail,
            vec![
                (SoilReport::CLOSING, Face::Italic),
                ("Developed by Nitin & Team", Face::Italic),
            ]
        );
        assert_eq!(lines[3].color, Some(STATUS_GREEN));
    }

    #[test]
    fn test_layout_skips_heading_without_actions() {
        let lines = layout(&SoilReport::new(None, None, Vec::new()));
        assert!(lines.iter().all(|l| l.text != "Recommended Actions:"));
        assert_eq!(lines[2].text, "Predicted Fertility Score: N/A%");
    }

    #[test]
    fn test_many_actions_spill_onto_more_pages() {
        let actions = (0..120)
            .map(|i| format!("Action {i}: add compost and water thoroughly every week"))
            .collect();
        let report = SoilReport::new(None, None, actions);
        let bytes = PdfReportRenderer.render(&report).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_to_ascii_folds_dashes() {
        assert_eq!(to_ascii("150–200 kg/ha • R²"), "150-200 kg/ha - R2");
        assert_eq!(to_ascii("caf\u{e9}"), "caf?");
    }

    #[test]
    fn test_wrap_respects_columns() {
        let lines = wrap("aaa bbb ccc ddd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 10).is_empty());
    }
}
