use crate::domain::system_log::SystemErrorLog;
use crate::domain::user::User;
use crate::pagination::Paginated;

#[derive(Debug)]
pub struct SettingsPageData {
    pub profile: User,
}

#[derive(Debug)]
pub struct LogsPageData {
    pub logs: Paginated<SystemErrorLog>,
    pub search: Option<String>,
}
