use crate::CONSOLE_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::dashboard::AdminDashboard;
use crate::domain::qc_record::RecordStatus;
use crate::repository::{DashboardReader, QcRecordReader, RecordListQuery};
use crate::services::{ServiceResult, ensure_role, log_failure};

/// Dashboard aggregates plus the approval backlog, fetched concurrently.
pub async fn admin_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<AdminDashboard>
where
    R: DashboardReader + QcRecordReader + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let (data, records) = tokio::join!(
        repo.dashboard_data(),
        repo.list_records(RecordListQuery::new().status(RecordStatus::Submitted)),
    );
    let data = data.map_err(log_failure("load dashboard data"))?;
    let records = records.map_err(log_failure("load pending records"))?;

    Ok(data.merge(records))
}
