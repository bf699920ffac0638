//! Read-only aggregates: tasks, dashboard and the system error log.

use crate::domain::dashboard::DashboardData;
use crate::domain::system_log::SystemErrorLog;
use crate::domain::task::TaskAssignment;
use crate::domain::types::UserId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{BackendRepository, DashboardReader, SystemLogReader, TaskReader};

impl TaskReader for BackendRepository {
    async fn list_active_tasks(&self, user_id: UserId) -> RepositoryResult<Vec<TaskAssignment>> {
        self.get(&format!("/task-assignments/active/{user_id}")).await
    }
}

impl DashboardReader for BackendRepository {
    async fn dashboard_data(&self) -> RepositoryResult<DashboardData> {
        self.get("/dashboard/data").await
    }
}

impl SystemLogReader for BackendRepository {
    async fn list_system_logs(&self) -> RepositoryResult<Vec<SystemErrorLog>> {
        self.get("/system/logs").await
    }
}
