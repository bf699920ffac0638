//! Locally stored QC entry drafts.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::qc_entry::EntryValues;
use crate::domain::types::{MachineId, TemplateId, UserId};

/// Draft as loaded from the local store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QcDraft {
    pub id: i32,
    pub user_id: UserId,
    pub draft_key: String,
    pub template_id: TemplateId,
    pub machine_id: MachineId,
    pub values: EntryValues,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Draft to be inserted or replaced.
#[derive(Clone, Debug, PartialEq)]
pub struct NewQcDraft {
    pub user_id: UserId,
    pub template_id: TemplateId,
    pub machine_id: MachineId,
    pub values: EntryValues,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}
