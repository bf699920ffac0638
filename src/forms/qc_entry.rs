//! Operator entry form.
//!
//! Field names are generated from the template (`{fieldKey}` or
//! `{fieldKey}_sample_{n}`), so the body is read as a plain map and resolved
//! against the template by [`EntryValues::from_form`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::qc_entry::EntryValues;
use crate::domain::qc_template::QcFormTemplate;
use crate::forms::{FormError, optional_text};

/// Control keys posted next to the field values.
const ACTION_KEY: &str = "_action";
const NOTES_KEY: &str = "_notes";
const SAMPLE_KEY: &str = "_sample";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryAction {
    /// Store the values as a draft and stay on the page.
    SaveDraft,
    /// Store the values and switch to another sample.
    OpenSample(u32),
    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntrySubmission {
    pub values: EntryValues,
    pub notes: Option<String>,
    pub action: EntryAction,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub task_id: Option<i64>,
    pub sample: Option<u32>,
}

impl EntrySubmission {
    pub fn parse(template: &QcFormTemplate, body: &[u8]) -> Result<Self, FormError> {
        let pairs: HashMap<String, String> =
            serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))?;

        let action = match pairs.get(ACTION_KEY).map(String::as_str) {
            Some("submit") => EntryAction::Submit,
            Some("sample") => pairs
                .get(SAMPLE_KEY)
                .and_then(|raw| raw.parse().ok())
                .map(EntryAction::OpenSample)
                .unwrap_or(EntryAction::SaveDraft),
            Some(raw) => raw
                .strip_prefix("sample:")
                .and_then(|n| n.parse().ok())
                .map(EntryAction::OpenSample)
                .unwrap_or(EntryAction::SaveDraft),
            None => EntryAction::SaveDraft,
        };

        Ok(Self {
            values: EntryValues::from_form(template, &pairs),
            notes: optional_text(pairs.get(NOTES_KEY).cloned()),
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::qc_entry::EntryValue;

    fn template() -> QcFormTemplate {
        serde_json::from_value(serde_json::json!({
            "id": 1, "code": "T", "name": "T",
            "sections": [{"id": 1, "name": "S", "isRepeatable": true, "repeatCount": 3,
                "fields": [{"id": 1, "fieldKey": "len", "label": "Len", "inputType": "NUMBER"}]}]
        }))
        .unwrap()
    }

    #[test]
    fn parses_values_and_action() {
        let submission = EntrySubmission::parse(
            &template(),
            b"len_sample_2=12&_notes=+ok+&_action=sample:3",
        )
        .unwrap();

        assert_eq!(submission.action, EntryAction::OpenSample(3));
        assert_eq!(submission.notes.as_deref(), Some("ok"));
        assert_eq!(
            submission.values.get("len_sample_2"),
            Some(&EntryValue::Text("12".to_string()))
        );
    }

    #[test]
    fn submit_action() {
        let submission = EntrySubmission::parse(&template(), b"_action=submit").unwrap();
        assert_eq!(submission.action, EntryAction::Submit);
        assert!(submission.values.is_empty());
    }
}
