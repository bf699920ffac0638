//! Report generation from already fetched records.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::qc_record::QcFormRecord;
use crate::domain::preferences::Language;
use crate::i18n::translate;

pub mod csv;
pub mod pdf;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("CSV generation failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("failed to flush export buffer: {0}")]
    Buffer(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Column headers shared by the list exports.
pub(crate) const LIST_COLUMNS: [&str; 7] = [
    "col_code",
    "col_template",
    "col_subject",
    "col_filled_by",
    "col_result",
    "col_status",
    "col_date",
];

/// One row of the list exports, already localized.
pub(crate) fn list_row(record: &QcFormRecord, lang: Language) -> [String; 7] {
    [
        record.code().to_string(),
        record.template_label().to_string(),
        record.subject().to_string(),
        record.filled_by_name.clone().unwrap_or_else(|| "-".to_string()),
        record
            .overall_result
            .map(|result| translate(lang, result.as_str()).to_string())
            .unwrap_or_else(|| "-".to_string()),
        translate(lang, record.status.as_str()).to_string(),
        format_date(record),
    ]
}

pub(crate) fn format_date(record: &QcFormRecord) -> String {
    record
        .display_date()
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn file_stem(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `{title}_{YYYY-MM-DD}.{ext}`
pub fn list_file_name(title: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{extension}", file_stem(title), date.format("%Y-%m-%d"))
}

/// `{title}_#{id}_{code}.pdf`
pub fn record_file_name(title: &str, record: &QcFormRecord) -> String {
    format!(
        "{}_#{}_{}.pdf",
        file_stem(title),
        record.id,
        file_stem(record.code())
    )
}
