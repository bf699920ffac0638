use crate::domain::preferences::Language;
use crate::domain::qc_record::QcFormRecord;
use crate::export::{ExportError, ExportResult, LIST_COLUMNS, list_row};
use crate::i18n::translate;

/// Record list as CSV with the same columns as the PDF list report.
pub fn records_csv(records: &[QcFormRecord], lang: Language) -> ExportResult<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    writer.write_record(LIST_COLUMNS.iter().map(|key| translate(lang, key)))?;
    for record in records {
        writer.write_record(list_row(record, lang))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let records: Vec<QcFormRecord> = serde_json::from_value(serde_json::json!([
            {"id": 1, "templateId": 1, "templateCode": "QC-1", "templateName": "Shaft, outer",
             "status": "SUBMITTED"},
            {"id": 2, "templateId": 1, "templateCode": "QC-2", "status": "APPROVED",
             "overallResult": "PASS"}
        ]))
        .unwrap();

        let bytes = records_csv(&records, Language::En).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(translate(Language::En, "col_code")));
        assert!(lines[1].contains("\"Shaft, outer\""));
        assert!(lines[2].contains(translate(Language::En, "PASS")));
    }
}
