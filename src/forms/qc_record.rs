//! Review actions on QC records.

use serde::Deserialize;

use crate::domain::qc_record::{ManualResult, RecordStatus};
use crate::domain::types::RejectionReason;
use crate::forms::{FormError, optional_text};

#[derive(Debug, Deserialize)]
pub struct ApproveForm {
    #[serde(default)]
    pub result: ManualResult,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectForm {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub result: Option<ManualResult>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated rejection.
#[derive(Debug, PartialEq)]
pub struct Rejection {
    pub reason: RejectionReason,
    pub result: ManualResult,
    pub notes: Option<String>,
}

impl TryFrom<RejectForm> for Rejection {
    type Error = FormError;

    fn try_from(form: RejectForm) -> Result<Self, Self::Error> {
        Ok(Self {
            reason: RejectionReason::new(form.reason).map_err(|_| FormError::Required("reason"))?,
            result: form.result.unwrap_or(ManualResult::Fail),
            notes: optional_text(form.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NotesForm {
    #[serde(default)]
    pub notes: String,
}

/// Query string of the record list and its exports.
#[derive(Debug, Default, Deserialize)]
pub struct RecordListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

impl RecordListParams {
    /// Unknown or blank status means "all".
    pub fn status(&self) -> Option<RecordStatus> {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| RecordStatus::parse(s).ok())
    }

    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_requires_reason() {
        let form = RejectForm {
            reason: "  ".to_string(),
            result: None,
            notes: None,
        };
        assert!(matches!(
            Rejection::try_from(form),
            Err(FormError::Required("reason"))
        ));
    }

    #[test]
    fn rejection_defaults_to_fail() {
        let form = RejectForm {
            reason: "Burr on edge".to_string(),
            result: None,
            notes: Some("re-check".to_string()),
        };
        let rejection = Rejection::try_from(form).unwrap();
        assert_eq!(rejection.result, ManualResult::Fail);
        assert_eq!(rejection.reason.as_str(), "Burr on edge");
    }

    #[test]
    fn list_params() {
        let params = RecordListParams {
            status: Some("submitted".to_string()),
            search: Some("  ".to_string()),
            page: None,
        };
        assert_eq!(params.status(), Some(RecordStatus::Submitted));
        assert_eq!(params.search(), None);
    }
}
