//! PDF reports built with the standard Helvetica font.
//!
//! Builtin PDF fonts only cover WinAnsi, so Turkish letters outside that set
//! are folded to their ASCII base letter before drawing.

use chrono::Local;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::domain::preferences::Language;
use crate::domain::qc_record::QcFormRecord;
use crate::export::{ExportError, ExportResult, LIST_COLUMNS, format_date, list_row};
use crate::i18n::translate;

const MARGIN: f32 = 12.0;
const ROW_HEIGHT: f32 = 6.5;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 16.0;
/// Rough Helvetica glyph width at 9pt, used to wrap cell text.
const CHAR_WIDTH: f32 = 1.75;
/// Distance between wrapped lines inside one cell.
const LINE_STEP: f32 = 4.0;

#[derive(Clone, Copy)]
enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    fn size(self) -> (f32, f32) {
        match self {
            Orientation::Portrait => (210.0, 297.0),
            Orientation::Landscape => (297.0, 210.0),
        }
    }
}

fn pdf_err(err: printpdf::Error) -> ExportError {
    ExportError::Pdf(err.to_string())
}

fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ş' => 's',
            'Ş' => 'S',
            'ğ' => 'g',
            'Ğ' => 'G',
            'ı' => 'i',
            'İ' => 'I',
            other => other,
        })
        .collect()
}

/// Breaks cell text into lines that fit `width`; words longer than a line
/// are split.
fn wrap(text: &str, width: f32) -> Vec<String> {
    let max = ((width - 2.0) / CHAR_WIDTH).max(1.0) as usize;
    let text = pdf_safe(text);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..max).collect());
        }
        if word.is_empty() {
            continue;
        }
        let used = line.chars().count();
        if used > 0 && used + 1 + word.len() > max {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Writes rows top to bottom, starting a new page when one is full.
struct Report {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    orientation: Orientation,
    y: f32,
}

impl Report {
    fn new(title: &str, orientation: Orientation) -> ExportResult<Self> {
        let (width, height) = orientation.size();
        let (doc, page, layer) = PdfDocument::new(pdf_safe(title), Mm(width), Mm(height), "content");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            bold,
            orientation,
            y: height - MARGIN,
        })
    }

    fn width(&self) -> f32 {
        self.orientation.size().0 - 2.0 * MARGIN
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed >= MARGIN {
            return;
        }
        let (width, height) = self.orientation.size();
        let (page, layer) = self.doc.add_page(Mm(width), Mm(height), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = height - MARGIN;
    }

    fn title(&mut self, text: &str) {
        self.ensure_space(TITLE_SIZE);
        self.y -= 8.0;
        self.layer
            .use_text(pdf_safe(text), TITLE_SIZE, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= 6.0;
    }

    fn subtitle(&mut self, text: &str) {
        self.ensure_space(ROW_HEIGHT);
        self.layer
            .use_text(pdf_safe(text), FONT_SIZE, Mm(MARGIN), Mm(self.y), &self.font);
        self.y -= ROW_HEIGHT + 2.0;
    }

    fn rule(&self) {
        let y = self.y + ROW_HEIGHT - 2.0;
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y)), false),
                (Point::new(Mm(MARGIN + self.width()), Mm(y)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    /// Draws one row; `widths` are fractions of the printable width. Long
    /// cells wrap and the row grows to the tallest cell.
    fn row(&mut self, cells: &[String], widths: &[f32], header: bool) {
        let width = self.width();
        let wrapped: Vec<(Vec<String>, f32)> = cells
            .iter()
            .zip(widths)
            .map(|(cell, fraction)| (wrap(cell, width * fraction), width * fraction))
            .collect();
        let lines = wrapped.iter().map(|(lines, _)| lines.len()).max().unwrap_or(1);
        let extra = (lines.saturating_sub(1)) as f32 * LINE_STEP;
        self.ensure_space(ROW_HEIGHT + extra);

        let font = if header { &self.bold } else { &self.font };
        let mut x = MARGIN;
        for (cell_lines, cell_width) in &wrapped {
            for (i, line) in cell_lines.iter().enumerate() {
                let y = self.y - i as f32 * LINE_STEP;
                self.layer
                    .use_text(line.as_str(), FONT_SIZE, Mm(x), Mm(y), font);
            }
            x += cell_width;
        }
        if header {
            self.y -= 1.5;
            self.rule();
        }
        self.y -= ROW_HEIGHT + extra;
    }

    fn gap(&mut self) {
        self.y -= ROW_HEIGHT / 2.0;
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}

fn generated_line(lang: Language) -> String {
    format!(
        "{}: {}",
        translate(lang, "generated_at"),
        Local::now().format("%Y-%m-%d %H:%M")
    )
}

/// Landscape list report with the standard record columns.
pub fn records_list_pdf(records: &[QcFormRecord], lang: Language) -> ExportResult<Vec<u8>> {
    const WIDTHS: [f32; 7] = [0.11, 0.22, 0.16, 0.15, 0.09, 0.12, 0.15];

    let title = translate(lang, "records_report_title");
    let mut report = Report::new(title, Orientation::Landscape)?;
    report.title(title);
    report.subtitle(&format!(
        "{}  |  {}: {}",
        generated_line(lang),
        translate(lang, "total"),
        records.len()
    ));

    let header: Vec<String> = LIST_COLUMNS
        .iter()
        .map(|key| translate(lang, key).to_string())
        .collect();
    report.row(&header, &WIDTHS, true);
    for record in records {
        report.row(&list_row(record, lang), &WIDTHS, false);
    }

    report.finish()
}

/// Portrait report of a single record: summary, values, notes.
pub fn record_pdf(record: &QcFormRecord, lang: Language) -> ExportResult<Vec<u8>> {
    const PAIR: [f32; 2] = [0.3, 0.7];
    const VALUES: [f32; 3] = [0.5, 0.3, 0.2];

    let title = translate(lang, "record_report_title");
    let mut report = Report::new(title, Orientation::Portrait)?;
    report.title(&format!("{title} #{}", record.id));
    report.subtitle(&generated_line(lang));

    let dash = || "-".to_string();
    let summary = [
        ("col_code", record.code().to_string()),
        ("col_template", record.template_label().to_string()),
        ("col_subject", record.subject().to_string()),
        ("col_status", translate(lang, record.status.as_str()).to_string()),
        (
            "col_result",
            record
                .overall_result
                .map(|r| translate(lang, r.as_str()).to_string())
                .unwrap_or_else(dash),
        ),
        ("col_filled_by", record.filled_by_name.clone().unwrap_or_else(dash)),
        ("col_date", format_date(record)),
        ("approved_by", record.approved_by_name.clone().unwrap_or_else(dash)),
    ];
    for (key, value) in summary {
        report.row(&[translate(lang, key).to_string(), value], &PAIR, false);
    }

    report.gap();
    report.row(
        &[
            translate(lang, "field").to_string(),
            translate(lang, "value").to_string(),
            translate(lang, "col_result").to_string(),
        ],
        &VALUES,
        true,
    );
    let sample = translate(lang, "sample");
    for value in &record.values {
        report.row(
            &[
                value.display_label(sample),
                value.display_value(),
                value.result.clone().unwrap_or_else(dash),
            ],
            &VALUES,
            false,
        );
    }

    if let Some(notes) = record.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        report.gap();
        report.row(&[translate(lang, "notes").to_string(), notes.to_string()], &PAIR, false);
    }
    if let Some(reason) = record.rejection_reason.as_deref() {
        report.row(
            &[translate(lang, "rejection_reason").to_string(), reason.to_string()],
            &PAIR,
            false,
        );
    }

    report.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> QcFormRecord {
        serde_json::from_value(serde_json::json!({
            "id": 4, "templateId": 1, "templateCode": "QC-4", "templateName": "Şaft kontrolü",
            "status": "REJECTED", "overallResult": "FAIL", "rejectionReason": "Çapak",
            "values": [
                {"fieldId": 1, "fieldLabel": "Length", "repeatIndex": 1, "valueNumber": 10.2},
                {"fieldId": 2, "fieldLabel": "Visual", "valueBoolean": true}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn produces_pdf_documents() {
        let single = record_pdf(&record(), Language::Tr).unwrap();
        assert!(single.starts_with(b"%PDF"));

        let many: Vec<QcFormRecord> = (0..120).map(|_| record()).collect();
        let list = records_list_pdf(&many, Language::En).unwrap();
        assert!(list.starts_with(b"%PDF"));
    }

    #[test]
    fn folds_letters_outside_winansi() {
        assert_eq!(pdf_safe("Işık Şğ"), "Isik Sg");
    }

    #[test]
    fn wraps_instead_of_cutting() {
        // (10 - 2) / 1.75 leaves room for four characters per line.
        assert_eq!(wrap("abcdefghij", 10.0), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ab cd ef", 10.0), vec!["ab", "cd", "ef"]);
        assert_eq!(wrap("", 10.0), vec![""]);
    }

    #[test]
    fn long_rejection_reason_keeps_every_word() {
        let reason = "Surface has deep scratches along the whole shaft; operator must \
                      re-measure every sample and report to the shift supervisor today.";
        // Value column of the portrait summary table.
        let width = (210.0 - 2.0 * MARGIN) * 0.7;
        let lines = wrap(reason, width);

        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), reason.split_whitespace().collect::<Vec<_>>().join(" "));
        let max = ((width - 2.0) / CHAR_WIDTH) as usize;
        assert!(lines.iter().all(|line| line.chars().count() <= max));

        let mut rejected = record();
        rejected.rejection_reason = Some(reason.to_string());
        rejected.notes = Some(reason.repeat(3));
        assert!(record_pdf(&rejected, Language::En).unwrap().starts_with(b"%PDF"));
    }
}
