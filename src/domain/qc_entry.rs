//! In-progress QC entry state for the operator console.
//!
//! Values are keyed by the field key, or by `{fieldKey}_sample_{n}` inside
//! a repeating section. The same map is persisted as the operator's draft
//! and flattened into the record request on submit.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::qc_record::QcFormValueRequest;
use crate::domain::qc_template::{InputType, QcFormField, QcFormSection, QcFormTemplate};
use crate::domain::types::{MachineId, TemplateId, parse_optional_number};

/// A captured value: a toggle or free text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EntryValue {
    Bool(bool),
    Text(String),
}

impl EntryValue {
    pub fn is_filled(&self) -> bool {
        match self {
            EntryValue::Bool(_) => true,
            EntryValue::Text(text) => !text.trim().is_empty(),
        }
    }
}

/// Storage key of a field value, optionally scoped to a sample.
pub fn value_key(field: &QcFormField, sample: Option<u32>) -> String {
    match sample {
        Some(n) => format!("{}_sample_{n}", field.field_key),
        None => field.field_key.clone(),
    }
}

fn is_free_text(input_type: &InputType) -> bool {
    matches!(input_type, InputType::Text | InputType::TextArea)
}

/// Local draft key for a template/machine pair.
pub fn draft_key(template_id: TemplateId, machine_id: MachineId) -> String {
    format!("qc_draft_{template_id}_{machine_id}")
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SampleStatus {
    Empty,
    Partial,
    Passed,
    Failed,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SampleSummary {
    pub index: u32,
    pub status: SampleStatus,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Progress {
    pub filled: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.filled * 100) / self.total).min(100) as u8
    }
}

/// Values captured so far, ordered by key.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EntryValues(BTreeMap<String, EntryValue>);

impl EntryValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: EntryValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&EntryValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn filled(&self, key: &str) -> Option<&EntryValue> {
        self.get(key).filter(|value| value.is_filled())
    }

    /// Reads posted form pairs for every field of the template.
    ///
    /// Toggle fields accept `true`/`false`; anything else is kept as text.
    /// Keys that do not belong to the template are ignored.
    pub fn from_form(template: &QcFormTemplate, form: &HashMap<String, String>) -> Self {
        let mut values = Self::new();
        for section in &template.sections {
            for sample in samples(section) {
                for field in &section.fields {
                    let key = value_key(field, sample);
                    let Some(raw) = form.get(&key) else {
                        continue;
                    };
                    let value = if field.input_type.is_boolean() {
                        match raw.trim() {
                            "true" => EntryValue::Bool(true),
                            "false" => EntryValue::Bool(false),
                            _ => continue,
                        }
                    } else {
                        EntryValue::Text(raw.clone())
                    };
                    values.set(key, value);
                }
            }
        }
        values
    }

    /// Overlays newly posted values onto a stored draft.
    pub fn merge(&mut self, other: EntryValues) {
        self.0.extend(other.0);
    }

    fn field_failed(&self, field: &QcFormField, key: &str) -> bool {
        match self.filled(key) {
            Some(EntryValue::Bool(flag)) => field.input_type.is_boolean() && !flag,
            Some(EntryValue::Text(text)) if field.input_type.is_numeric() => {
                matches!(parse_optional_number(text), Ok(Some(number)) if field.out_of_range(number))
            }
            _ => false,
        }
    }

    /// Status of one sample of a repeating section.
    pub fn sample_status(&self, section: &QcFormSection, sample: u32) -> SampleStatus {
        let total = section.fields.len();
        let filled = section
            .fields
            .iter()
            .filter(|field| self.filled(&value_key(field, Some(sample))).is_some())
            .count();

        if filled == 0 {
            return SampleStatus::Empty;
        }
        if section
            .fields
            .iter()
            .any(|field| self.field_failed(field, &value_key(field, Some(sample))))
        {
            return SampleStatus::Failed;
        }
        if filled < total {
            SampleStatus::Partial
        } else {
            SampleStatus::Passed
        }
    }

    /// One summary per sample button of a repeating section.
    pub fn sample_summaries(&self, section: &QcFormSection) -> Vec<SampleSummary> {
        if !section.is_repeating() {
            return Vec::new();
        }
        (1..=section.sample_count())
            .map(|index| SampleSummary {
                index,
                status: self.sample_status(section, index),
            })
            .collect()
    }

    /// Filled versus expected values across every sample.
    pub fn progress(&self, template: &QcFormTemplate) -> Progress {
        let mut progress = Progress {
            filled: 0,
            total: 0,
        };
        for section in &template.sections {
            for sample in samples(section) {
                for field in &section.fields {
                    progress.total += 1;
                    if self.filled(&value_key(field, sample)).is_some() {
                        progress.filled += 1;
                    }
                }
            }
        }
        progress
    }

    /// Required fields of the template that have no value yet.
    pub fn missing_required<'a>(&self, template: &'a QcFormTemplate) -> Vec<&'a str> {
        let mut missing = Vec::new();
        for section in &template.sections {
            for sample in samples(section) {
                for field in section.fields.iter().filter(|field| field.required) {
                    if self.filled(&value_key(field, sample)).is_none()
                        && !missing.contains(&field.label.as_str())
                    {
                        missing.push(field.label.as_str());
                    }
                }
            }
        }
        missing
    }

    /// Converts captured values into the record's value array.
    ///
    /// Booleans go to `valueBoolean`. Text that parses as a number goes to
    /// `valueNumber` unless the field is free text, where leading zeros and
    /// the like must survive. Everything else goes to `valueText`. Values of repeating
    /// sections carry `repeatIndex = n` and `groupKey = sample_n`. Empty
    /// values are skipped.
    pub fn flatten(&self, template: &QcFormTemplate) -> Vec<QcFormValueRequest> {
        let mut out = Vec::new();
        for section in &template.sections {
            for sample in samples(section) {
                for field in &section.fields {
                    let Some(value) = self.filled(&value_key(field, sample)) else {
                        continue;
                    };
                    let mut request = QcFormValueRequest {
                        field_id: field.id,
                        repeat_index: sample,
                        group_key: sample.map(|n| format!("sample_{n}")),
                        value_text: None,
                        value_number: None,
                        value_boolean: None,
                    };
                    match value {
                        EntryValue::Bool(flag) => request.value_boolean = Some(*flag),
                        EntryValue::Text(text) => match parse_optional_number(text) {
                            Ok(Some(number)) if !is_free_text(&field.input_type) => {
                                request.value_number = Some(number)
                            }
                            _ => request.value_text = Some(text.trim().to_string()),
                        },
                    }
                    out.push(request);
                }
            }
        }
        out
    }
}

/// `None` for a plain section, `Some(1..=n)` for a repeating one.
fn samples(section: &QcFormSection) -> Vec<Option<u32>> {
    if section.is_repeating() {
        (1..=section.sample_count()).map(Some).collect()
    } else {
        vec![None]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::FieldId;

    fn template(repeat_count: u32) -> QcFormTemplate {
        serde_json::from_value(serde_json::json!({
            "id": 7, "code": "QC-7", "name": "Shaft",
            "sections": [
                {"id": 1, "name": "Control Points", "sectionOrder": 1, "isRepeatable": false,
                 "fields": [
                    {"id": 10, "fieldKey": "visual", "label": "Visual", "inputType": "PASS_FAIL", "required": true},
                    {"id": 11, "fieldKey": "remark", "label": "Remark", "inputType": "TEXT"}
                 ]},
                {"id": 2, "name": "Repeated Controls", "sectionOrder": 2, "isRepeatable": true,
                 "repeatCount": repeat_count,
                 "fields": [
                    {"id": 20, "fieldKey": "length", "label": "Length", "inputType": "DECIMAL",
                     "minValue": 9.5, "maxValue": 10.5, "required": true},
                    {"id": 21, "fieldKey": "burr", "label": "Burr", "inputType": "BOOLEAN"}
                 ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn five_samples_for_repeat_count_five() {
        let template = template(5);
        let values = EntryValues::new();
        let summaries = values.sample_summaries(&template.sections[1]);

        assert_eq!(summaries.len(), 5);
        assert_eq!(
            summaries.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(values.sample_summaries(&template.sections[0]).is_empty());
    }

    #[test]
    fn flatten_assigns_repeat_index_and_group_key() {
        let template = template(5);
        let mut values = EntryValues::new();
        values.set("visual", EntryValue::Bool(true));
        values.set("remark", EntryValue::Text("  ".to_string()));
        values.set("length_sample_1", EntryValue::Text("10.1".to_string()));
        values.set("length_sample_5", EntryValue::Text("9,8".to_string()));
        values.set("burr_sample_3", EntryValue::Bool(false));

        let flat = values.flatten(&template);

        assert_eq!(flat.len(), 4);
        assert_eq!(flat[0].field_id, FieldId::new(10).unwrap());
        assert_eq!(flat[0].value_boolean, Some(true));
        assert_eq!(flat[0].repeat_index, None);

        let length: Vec<_> = flat
            .iter()
            .filter(|v| v.field_id.get() == 20)
            .map(|v| (v.repeat_index, v.group_key.clone(), v.value_number))
            .collect();
        assert_eq!(
            length,
            vec![
                (Some(1), Some("sample_1".to_string()), Some(10.1)),
                (Some(5), Some("sample_5".to_string()), Some(9.8)),
            ]
        );

        let burr = flat.iter().find(|v| v.field_id.get() == 21).unwrap();
        assert_eq!(burr.repeat_index, Some(3));
        assert_eq!(burr.value_boolean, Some(false));
    }

    #[test]
    fn numeric_options_are_sent_as_numbers() {
        let template: QcFormTemplate = serde_json::from_value(serde_json::json!({
            "id": 8, "code": "QC-8", "name": "Packing",
            "sections": [{"id": 1, "name": "Control Points", "fields": [
                {"id": 30, "fieldKey": "layers", "label": "Layers", "inputType": "SELECT",
                 "options": ["3", "5"]},
                {"id": 31, "fieldKey": "lot", "label": "Lot", "inputType": "TEXT"},
                {"id": 32, "fieldKey": "color", "label": "Color", "inputType": "SELECT",
                 "options": ["Red", "Blue"]}
            ]}]
        }))
        .unwrap();
        let mut values = EntryValues::new();
        values.set("layers", EntryValue::Text("5".to_string()));
        values.set("lot", EntryValue::Text("0012".to_string()));
        values.set("color", EntryValue::Text("Red".to_string()));

        let flat = values.flatten(&template);
        let by_field = |id: i64| flat.iter().find(|v| v.field_id.get() == id).unwrap();

        assert_eq!(by_field(30).value_number, Some(5.0));
        assert_eq!(by_field(30).value_text, None);
        assert_eq!(by_field(31).value_text.as_deref(), Some("0012"));
        assert_eq!(by_field(31).value_number, None);
        assert_eq!(by_field(32).value_text.as_deref(), Some("Red"));
    }

    #[test]
    fn single_repeat_section_is_plain() {
        let template = template(1);
        let mut values = EntryValues::new();
        values.set("length", EntryValue::Text("10".to_string()));

        let flat = values.flatten(&template);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].repeat_index, None);
        assert_eq!(values.progress(&template), Progress { filled: 1, total: 4 });
    }

    #[test]
    fn sample_status_rules() {
        let template = template(3);
        let section = &template.sections[1];
        let mut values = EntryValues::new();

        assert_eq!(values.sample_status(section, 1), SampleStatus::Empty);

        values.set("length_sample_1", EntryValue::Text("10".to_string()));
        assert_eq!(values.sample_status(section, 1), SampleStatus::Partial);

        values.set("burr_sample_1", EntryValue::Bool(true));
        assert_eq!(values.sample_status(section, 1), SampleStatus::Passed);

        values.set("length_sample_2", EntryValue::Text("11".to_string()));
        assert_eq!(values.sample_status(section, 2), SampleStatus::Failed);

        values.set("burr_sample_3", EntryValue::Bool(false));
        assert_eq!(values.sample_status(section, 3), SampleStatus::Failed);
    }

    #[test]
    fn progress_counts_every_sample() {
        let template = template(5);
        let mut values = EntryValues::new();
        values.set("visual", EntryValue::Bool(false));
        values.set("length_sample_2", EntryValue::Text("10".to_string()));

        let progress = values.progress(&template);
        assert_eq!(progress, Progress { filled: 2, total: 12 });
        assert_eq!(progress.percent(), 16);
        assert_eq!(values.missing_required(&template), vec!["Length"]);
    }

    #[test]
    fn reads_form_pairs() {
        let template = template(2);
        let form: HashMap<String, String> = [
            ("visual", "false"),
            ("remark", "scratched"),
            ("burr_sample_2", "maybe"),
            ("length_sample_2", "10.2"),
            ("unknown", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let values = EntryValues::from_form(&template, &form);

        assert_eq!(values.get("visual"), Some(&EntryValue::Bool(false)));
        assert_eq!(values.get("remark"), Some(&EntryValue::Text("scratched".to_string())));
        assert_eq!(values.get("burr_sample_2"), None);
        assert_eq!(values.get("unknown"), None);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn values_serialize_as_plain_json_object() {
        let mut values = EntryValues::new();
        values.set("visual", EntryValue::Bool(true));
        values.set("length_sample_1", EntryValue::Text("10".to_string()));

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"length_sample_1":"10","visual":true}"#);
        let back: EntryValues = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn draft_key_format() {
        assert_eq!(
            draft_key(TemplateId::new(4).unwrap(), MachineId::new(9).unwrap()),
            "qc_draft_4_9"
        );
    }
}
