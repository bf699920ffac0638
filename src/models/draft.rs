//! Diesel models for locally stored QC drafts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::draft::{NewQcDraft as DomainNewQcDraft, QcDraft as DomainQcDraft};
use crate::domain::qc_entry::{EntryValues, draft_key};
use crate::domain::types::{MachineId, TemplateId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::qc_drafts)]
/// Diesel model for [`crate::domain::draft::QcDraft`].
pub struct QcDraft {
    pub id: i32,
    pub user_id: i64,
    pub draft_key: String,
    pub template_id: i64,
    pub machine_id: i64,
    pub payload: String,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::qc_drafts)]
/// Insertable form of [`QcDraft`].
pub struct NewQcDraft {
    pub user_id: i64,
    pub draft_key: String,
    pub template_id: i64,
    pub machine_id: i64,
    pub payload: String,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<QcDraft> for DomainQcDraft {
    type Error = TypeConstraintError;

    fn try_from(draft: QcDraft) -> Result<Self, Self::Error> {
        let values: EntryValues = serde_json::from_str(&draft.payload)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("draft payload: {e}")))?;
        Ok(Self {
            id: draft.id,
            user_id: UserId::try_from(draft.user_id)?,
            draft_key: draft.draft_key,
            template_id: TemplateId::try_from(draft.template_id)?,
            machine_id: MachineId::try_from(draft.machine_id)?,
            values,
            notes: draft.notes,
            updated_at: draft.updated_at,
        })
    }
}

impl TryFrom<&DomainNewQcDraft> for NewQcDraft {
    type Error = serde_json::Error;

    fn try_from(draft: &DomainNewQcDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: draft.user_id.get(),
            draft_key: draft_key(draft.template_id, draft.machine_id),
            template_id: draft.template_id.get(),
            machine_id: draft.machine_id.get(),
            payload: serde_json::to_string(&draft.values)?,
            notes: draft.notes.clone(),
            updated_at: draft.updated_at,
        })
    }
}
