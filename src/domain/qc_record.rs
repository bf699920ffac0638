//! QC form records as reported by the backend.
//!
//! The backend owns the status state machine. The console only renders the
//! reported status and offers the review actions valid for a submitted
//! record.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    FieldId, MachineId, ProductId, RecordId, TaskId, TemplateId, TypeConstraintError, UserId,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Draft,
    InProgress,
    Submitted,
    Approved,
    Rejected,
}

/// One step of the status stepper shown on the record page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StepperStep {
    pub status: RecordStatus,
    pub completed: bool,
    pub current: bool,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 5] = [
        RecordStatus::Draft,
        RecordStatus::InProgress,
        RecordStatus::Submitted,
        RecordStatus::Approved,
        RecordStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Draft => "DRAFT",
            RecordStatus::InProgress => "IN_PROGRESS",
            RecordStatus::Submitted => "SUBMITTED",
            RecordStatus::Approved => "APPROVED",
            RecordStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("record status `{value}`")))
    }

    /// Approved and rejected records accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, RecordStatus::Approved | RecordStatus::Rejected)
    }

    /// Only submitted records can be approved or rejected.
    pub fn is_reviewable(self) -> bool {
        self == RecordStatus::Submitted
    }

    fn rank(self) -> u8 {
        match self {
            RecordStatus::Draft => 0,
            RecordStatus::InProgress => 1,
            RecordStatus::Submitted => 2,
            RecordStatus::Approved | RecordStatus::Rejected => 3,
        }
    }

    /// Draft → In progress → Submitted → Approved | Rejected.
    ///
    /// The last step shows whichever terminal state was reached, defaulting to
    /// `Approved` while the record is still open.
    pub fn stepper(self) -> Vec<StepperStep> {
        let last = if self == RecordStatus::Rejected {
            RecordStatus::Rejected
        } else {
            RecordStatus::Approved
        };
        [
            RecordStatus::Draft,
            RecordStatus::InProgress,
            RecordStatus::Submitted,
            last,
        ]
        .into_iter()
        .map(|step| StepperStep {
            status: step,
            completed: step.rank() < self.rank() || (step == self && self.is_terminal()),
            current: step == self,
        })
        .collect()
    }
}

impl Display for RecordStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallResult {
    Pass,
    Fail,
    Warning,
    Na,
    Partial,
}

impl OverallResult {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallResult::Pass => "PASS",
            OverallResult::Fail => "FAIL",
            OverallResult::Warning => "WARNING",
            OverallResult::Na => "NA",
            OverallResult::Partial => "PARTIAL",
        }
    }
}

/// Result picked by a reviewer when approving or rejecting.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManualResult {
    #[default]
    Pass,
    Fail,
    Partial,
}

impl ManualResult {
    pub const ALL: [ManualResult; 3] = [ManualResult::Pass, ManualResult::Fail, ManualResult::Partial];

    pub fn as_str(self) -> &'static str {
        match self {
            ManualResult::Pass => "PASS",
            ManualResult::Fail => "FAIL",
            ManualResult::Partial => "PARTIAL",
        }
    }
}

impl Display for ManualResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormValue {
    #[serde(default)]
    pub id: Option<i64>,
    pub field_id: FieldId,
    #[serde(default)]
    pub field_key: Option<String>,
    #[serde(default)]
    pub field_label: Option<String>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub repeat_index: Option<u32>,
    #[serde(default)]
    pub group_key: Option<String>,
    #[serde(default)]
    pub value_text: Option<String>,
    #[serde(default)]
    pub value_number: Option<f64>,
    #[serde(default)]
    pub value_boolean: Option<bool>,
    #[serde(default)]
    pub result: Option<String>,
}

impl QcFormValue {
    /// Human-readable value: booleans as OK/NOK, numbers without trailing zeros.
    pub fn display_value(&self) -> String {
        if let Some(flag) = self.value_boolean {
            return if flag { "OK" } else { "NOK" }.to_string();
        }
        if let Some(number) = self.value_number {
            return number.to_string();
        }
        self.value_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or("-")
            .to_string()
    }

    /// Field label, suffixed with the sample number for repeated values.
    pub fn display_label(&self, sample_word: &str) -> String {
        let label = self
            .field_label
            .as_deref()
            .or(self.field_key.as_deref())
            .unwrap_or("-");
        match self.repeat_index {
            Some(index) => format!("{label} ({sample_word} {index})"),
            None => label.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormRecord {
    pub id: RecordId,
    pub template_id: TemplateId,
    #[serde(default)]
    pub template_code: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub machine_id: Option<MachineId>,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub product_instance_id: Option<i64>,
    #[serde(default, alias = "productInstanceSerial")]
    pub product_instance_serial_number: Option<String>,
    #[serde(default)]
    pub header_data: BTreeMap<String, serde_json::Value>,
    pub status: RecordStatus,
    #[serde(default)]
    pub overall_result: Option<OverallResult>,
    #[serde(default)]
    pub filled_by_id: Option<UserId>,
    #[serde(default)]
    pub filled_by_name: Option<String>,
    #[serde(default)]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub approved_by_id: Option<UserId>,
    #[serde(default)]
    pub approved_by_name: Option<String>,
    #[serde(default)]
    pub approved_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub values: Vec<QcFormValue>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl QcFormRecord {
    /// Machine name, else product serial, else `-`.
    pub fn subject(&self) -> &str {
        self.machine_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self
                .product_instance_serial_number
                .as_deref()
                .filter(|serial| !serial.is_empty()))
            .unwrap_or("-")
    }

    pub fn template_label(&self) -> &str {
        self.template_name.as_deref().unwrap_or("-")
    }

    pub fn code(&self) -> &str {
        self.template_code.as_deref().unwrap_or("-")
    }

    /// Timestamp shown in lists: submission, else creation.
    pub fn display_date(&self) -> Option<NaiveDateTime> {
        self.submitted_at.or(self.created_at)
    }

    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.template_name.as_deref(),
            self.template_code.as_deref(),
            self.product_instance_serial_number.as_deref(),
            self.machine_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// Keeps only records awaiting review.
pub fn filter_pending(records: Vec<QcFormRecord>) -> Vec<QcFormRecord> {
    records
        .into_iter()
        .filter(|record| record.status.is_reviewable())
        .collect()
}

/// Case-insensitive search over template name/code, serial and machine.
pub fn search_records(records: Vec<QcFormRecord>, term: Option<&str>) -> Vec<QcFormRecord> {
    match term.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => records
            .into_iter()
            .filter(|record| record.matches(term))
            .collect(),
        None => records,
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormValueRequest {
    pub field_id: FieldId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
}

/// Header block sent with a new record.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordHeader {
    pub submitted_at: NaiveDateTime,
    pub total_fields: usize,
    pub filled_fields: usize,
}

/// Payload accepted by `POST /qc-records`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormRecordRequest {
    pub template_id: TemplateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<MachineId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_assignment_id: Option<TaskId>,
    pub header_data: RecordHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub values: Vec<QcFormValueRequest>,
}
