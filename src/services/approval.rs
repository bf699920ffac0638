//! Approval queue and review actions.

use crate::CONSOLE_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::qc_record::{QcFormRecord, RecordStatus, filter_pending};
use crate::domain::types::RecordId;
use crate::dto::qc::ApprovalPageData;
use crate::forms::qc_record::{ApproveForm, NotesForm, RejectForm, Rejection};
use crate::forms::optional_text;
use crate::repository::{QcRecordReader, QcRecordWriter, RecordListQuery};
use crate::services::{ServiceResult, ensure_role, log_failure};

/// Records awaiting review, oldest submission first.
pub async fn approval_queue<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ApprovalPageData>
where
    R: QcRecordReader + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let records = repo
        .list_records(RecordListQuery::new().status(RecordStatus::Submitted))
        .await
        .map_err(log_failure("load the approval queue"))?;

    // The status endpoint is trusted only as a hint.
    let mut records = filter_pending(records);
    records.sort_by(|a, b| a.display_date().cmp(&b.display_date()));

    Ok(ApprovalPageData { records })
}

pub async fn approve<R>(
    repo: &R,
    user: &AuthenticatedUser,
    record_id: i64,
    form: ApproveForm,
) -> ServiceResult<QcFormRecord>
where
    R: QcRecordWriter + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let id = RecordId::new(record_id)?;
    if let Some(notes) = optional_text(form.notes) {
        repo.update_record_notes(id, &notes)
            .await
            .map_err(log_failure("save review notes"))?;
    }
    let record = repo
        .approve_record(id, form.result)
        .await
        .map_err(log_failure("approve the record"))?;

    log::info!("Record {id} approved by {} as {}", user.username, form.result);
    Ok(record)
}

pub async fn reject<R>(
    repo: &R,
    user: &AuthenticatedUser,
    record_id: i64,
    form: RejectForm,
) -> ServiceResult<QcFormRecord>
where
    R: QcRecordWriter + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let id = RecordId::new(record_id)?;
    let rejection = Rejection::try_from(form)?;
    if let Some(notes) = &rejection.notes {
        repo.update_record_notes(id, notes)
            .await
            .map_err(log_failure("save review notes"))?;
    }
    let record = repo
        .reject_record(id, &rejection.reason, rejection.result)
        .await
        .map_err(log_failure("reject the record"))?;

    log::info!("Record {id} rejected by {}: {}", user.username, rejection.reason);
    Ok(record)
}

pub async fn update_notes<R>(
    repo: &R,
    user: &AuthenticatedUser,
    record_id: i64,
    form: NotesForm,
) -> ServiceResult<QcFormRecord>
where
    R: QcRecordWriter + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    repo.update_record_notes(RecordId::new(record_id)?, form.notes.trim())
        .await
        .map_err(log_failure("update record notes"))
}
