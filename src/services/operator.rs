//! Operator console: task board, template picker, QC entry and history.
//!
//! Entry values are merged into the operator's local draft on every post,
//! so switching samples or losing the connection never drops input. The
//! draft is removed once the backend accepts the record.

use chrono::{Duration, NaiveDateTime};

use crate::OPERATOR_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::draft::NewQcDraft;
use crate::domain::machine::Machine;
use crate::domain::qc_entry::{EntryValues, draft_key};
use crate::domain::qc_record::{QcFormRecordRequest, RecordHeader, RecordStatus};
use crate::domain::qc_template::QcFormTemplate;
use crate::domain::task::{TaskAssignment, TimeInfo};
use crate::domain::types::{MachineId, TaskId, TemplateId};
use crate::dto::operator::{
    EntryOutcome, EntryPageData, HistoryPageData, MachineTemplatesData, OperatorDashboardData,
    SampleGrid, TaskCard,
};
use crate::forms::qc_entry::{EntryAction, EntryQuery, EntrySubmission};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    DraftReader, DraftWriter, MachineReader, QcRecordReader, QcRecordWriter, QcTemplateReader,
    RecordListQuery, TaskReader, TemplateListQuery,
};
use crate::services::{ServiceError, ServiceResult, ensure_role, log_failure};

fn available(machine: &Machine) -> bool {
    machine.active && !machine.maintenance_mode
}

pub async fn operator_dashboard<R, D>(
    repo: &R,
    drafts: &D,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
    grace: Duration,
) -> ServiceResult<OperatorDashboardData>
where
    R: TaskReader + MachineReader + ?Sized,
    D: DraftReader + ?Sized,
{
    ensure_role(user, OPERATOR_ROLES)?;

    let (tasks, machines) = tokio::join!(
        repo.list_active_tasks(user.user_id()),
        repo.list_machines()
    );
    let tasks = tasks
        .map_err(log_failure("load assigned tasks"))?
        .into_iter()
        .filter(|task| task.active)
        .map(|task| TaskCard {
            time: TimeInfo::evaluate(&task, now, grace),
            task,
        })
        .collect();
    let machines = machines
        .map_err(log_failure("list machines"))?
        .into_iter()
        .filter(available)
        .collect();
    let drafts = drafts
        .list_drafts(user.user_id())
        .map_err(log_failure("list drafts"))?;

    Ok(OperatorDashboardData {
        tasks,
        machines,
        drafts,
    })
}

async fn load_machine<R>(repo: &R, machine_id: MachineId) -> ServiceResult<Machine>
where
    R: MachineReader + ?Sized,
{
    let machine = repo
        .get_machine_by_id(machine_id)
        .await
        .map_err(log_failure("load the machine"))?
        .ok_or(ServiceError::NotFound)?;
    if !available(&machine) {
        return Err(ServiceError::Form("machine_unavailable".to_string()));
    }
    Ok(machine)
}

async fn load_template<R>(repo: &R, template_id: TemplateId) -> ServiceResult<QcFormTemplate>
where
    R: QcTemplateReader + ?Sized,
{
    repo.get_template_by_id(template_id)
        .await
        .map_err(log_failure("load the template"))?
        .ok_or(ServiceError::NotFound)
}

async fn find_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    task_id: Option<i64>,
) -> ServiceResult<Option<TaskAssignment>>
where
    R: TaskReader + ?Sized,
{
    let Some(task_id) = task_id.map(TaskId::new).transpose()? else {
        return Ok(None);
    };
    let tasks = repo
        .list_active_tasks(user.user_id())
        .await
        .map_err(log_failure("load assigned tasks"))?;
    Ok(tasks.into_iter().find(|task| task.id == task_id))
}

/// Active templates attached to a machine.
pub async fn machine_templates<R>(
    repo: &R,
    user: &AuthenticatedUser,
    machine_id: i64,
) -> ServiceResult<MachineTemplatesData>
where
    R: MachineReader + QcTemplateReader + ?Sized,
{
    ensure_role(user, OPERATOR_ROLES)?;

    let machine = load_machine(repo, MachineId::new(machine_id)?).await?;
    let templates = repo
        .list_templates(TemplateListQuery::new().machine(machine.id))
        .await
        .map_err(log_failure("list machine templates"))?
        .into_iter()
        .filter(|template| template.active)
        .collect();

    Ok(MachineTemplatesData { machine, templates })
}

#[allow(clippy::too_many_arguments)]
pub async fn entry_page<R, D>(
    repo: &R,
    drafts: &D,
    user: &AuthenticatedUser,
    template_id: i64,
    machine_id: i64,
    query: &EntryQuery,
    now: NaiveDateTime,
    grace: Duration,
) -> ServiceResult<EntryPageData>
where
    R: QcTemplateReader + MachineReader + TaskReader + ?Sized,
    D: DraftReader + ?Sized,
{
    ensure_role(user, OPERATOR_ROLES)?;

    let template_id = TemplateId::new(template_id)?;
    let machine_id = MachineId::new(machine_id)?;
    let (template, machine, task) = tokio::join!(
        load_template(repo, template_id),
        load_machine(repo, machine_id),
        find_task(repo, user, query.task_id),
    );
    let (template, machine, task) = (template?, machine?, task?);

    let draft = drafts
        .get_draft(user.user_id(), &draft_key(template_id, machine_id))
        .map_err(log_failure("load the draft"))?;
    let has_draft = draft.is_some();
    let (values, notes) = draft
        .map(|draft| (draft.values, draft.notes))
        .unwrap_or_default();

    let grids = template
        .repeating_sections()
        .map(|section| SampleGrid {
            samples: values.sample_summaries(section),
            current: query.sample.unwrap_or(1).clamp(1, section.sample_count()),
            section: section.clone(),
        })
        .collect();

    Ok(EntryPageData {
        plain_sections: template.plain_sections().cloned().collect(),
        grids,
        progress: values.progress(&template),
        task: task.map(|task| TaskCard {
            time: TimeInfo::evaluate(&task, now, grace),
            task,
        }),
        template,
        machine,
        values,
        notes,
        has_draft,
    })
}

/// Handles an entry post: save the draft, switch sample or submit.
#[allow(clippy::too_many_arguments)]
pub async fn save_entry<R, D>(
    repo: &R,
    drafts: &D,
    user: &AuthenticatedUser,
    template_id: i64,
    machine_id: i64,
    task_id: Option<i64>,
    body: &[u8],
    now: NaiveDateTime,
    grace: Duration,
) -> ServiceResult<EntryOutcome>
where
    R: QcTemplateReader + TaskReader + QcRecordWriter + ?Sized,
    D: DraftReader + DraftWriter + ?Sized,
{
    ensure_role(user, OPERATOR_ROLES)?;

    let template_id = TemplateId::new(template_id)?;
    let machine_id = MachineId::new(machine_id)?;
    let key = draft_key(template_id, machine_id);
    let template = load_template(repo, template_id).await?;
    let submission = EntrySubmission::parse(&template, body)?;

    let mut values = drafts
        .get_draft(user.user_id(), &key)
        .map_err(log_failure("load the draft"))?
        .map(|draft| draft.values)
        .unwrap_or_else(EntryValues::new);
    values.merge(submission.values);

    drafts
        .save_draft(&NewQcDraft {
            user_id: user.user_id(),
            template_id,
            machine_id,
            values: values.clone(),
            notes: submission.notes.clone(),
            updated_at: now,
        })
        .map_err(log_failure("save the draft"))?;

    match submission.action {
        EntryAction::SaveDraft => return Ok(EntryOutcome::DraftSaved { sample: None }),
        EntryAction::OpenSample(n) => return Ok(EntryOutcome::DraftSaved { sample: Some(n) }),
        EntryAction::Submit => {}
    }

    let task = find_task(repo, user, task_id).await?;
    let late = task
        .as_ref()
        .is_some_and(|task| !TimeInfo::evaluate(task, now, grace).state.can_start());
    if late {
        log::warn!("{} submitted template {template_id} after its task window", user.username);
    }

    let missing: Vec<String> = values
        .missing_required(&template)
        .into_iter()
        .map(str::to_string)
        .collect();

    let progress = values.progress(&template);
    let request = QcFormRecordRequest {
        template_id,
        machine_id: Some(machine_id),
        product_id: template.product_id,
        task_assignment_id: task.map(|task| task.id),
        header_data: RecordHeader {
            submitted_at: now,
            total_fields: progress.total,
            filled_fields: progress.filled,
        },
        notes: submission.notes,
        values: values.flatten(&template),
    };

    let mut record = repo
        .create_record(&request)
        .await
        .map_err(log_failure("create the record"))?;
    if record.status != RecordStatus::Submitted {
        record = repo
            .submit_record(record.id)
            .await
            .map_err(log_failure("submit the record"))?;
    }

    drafts
        .delete_draft(user.user_id(), &key)
        .map_err(log_failure("delete the draft"))?;
    log::info!(
        "Record {} submitted by {} ({} of {} values)",
        record.id,
        user.username,
        progress.filled,
        progress.total
    );

    Ok(EntryOutcome::Submitted {
        record,
        missing,
        late,
    })
}

pub async fn discard_draft<D>(
    drafts: &D,
    user: &AuthenticatedUser,
    template_id: i64,
    machine_id: i64,
) -> ServiceResult<()>
where
    D: DraftWriter + ?Sized,
{
    ensure_role(user, OPERATOR_ROLES)?;

    let key = draft_key(TemplateId::new(template_id)?, MachineId::new(machine_id)?);
    drafts
        .delete_draft(user.user_id(), &key)
        .map_err(log_failure("discard the draft"))
}

/// Records filled by the signed-in user, newest first.
pub async fn history<R>(
    repo: &R,
    user: &AuthenticatedUser,
    page: Option<usize>,
) -> ServiceResult<HistoryPageData>
where
    R: QcRecordReader + ?Sized,
{
    ensure_role(user, OPERATOR_ROLES)?;

    let mut records = repo
        .list_records(RecordListQuery::new().mine())
        .await
        .map_err(log_failure("load record history"))?;
    records.sort_by(|a, b| b.display_date().cmp(&a.display_date()));

    Ok(HistoryPageData {
        records: Paginated::from_items(records, page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE),
    })
}


#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::types::UserId;
    use crate::domain::user::Role;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockDraftStore;
    use crate::services::fake::{FakeBackend, FakeState, machine, template, timestamp};
    use crate::services::test_support::user;

    #[actix_web::test]
    async fn draft_store_failure_aborts_before_backend_call() {
        let repo = FakeBackend::new(FakeState {
            templates: vec![template(2)],
            machines: vec![machine(3, true, false)],
            ..FakeState::default()
        });
        let mut drafts = MockDraftStore::new();
        drafts
            .expect_get_draft()
            .with(eq(UserId::new(7).unwrap()), eq("qc_draft_7_3"))
            .returning(|_, _| Ok(None));
        drafts
            .expect_save_draft()
            .times(1)
            .returning(|_| Err(RepositoryError::Unexpected("disk full".to_string())));
        drafts.expect_delete_draft().never();

        let result = save_entry(
            &repo,
            &drafts,
            &user(Role::Operator),
            7,
            3,
            None,
            b"visual=true&_action=submit",
            timestamp("2024-05-15 09:00:00"),
            Duration::zero(),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Repository(_))));
        assert!(!repo.calls().contains(&"create_record".to_string()));
    }

    #[actix_web::test]
    async fn discard_deletes_by_draft_key() {
        let mut drafts = MockDraftStore::new();
        drafts
            .expect_delete_draft()
            .with(eq(UserId::new(7).unwrap()), eq("qc_draft_7_3"))
            .times(1)
            .returning(|_, _| Ok(()));

        discard_draft(&drafts, &user(Role::Operator), 7, 3)
            .await
            .unwrap();
    }
}
