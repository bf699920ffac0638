//! Profile, UI preferences and the system log viewer.

use crate::auth::AuthenticatedUser;
use crate::domain::preferences::{Language, Theme, UiPreferences};
use crate::dto::settings::{LogsPageData, SettingsPageData};
use crate::forms::FormError;
use crate::forms::settings::{DismissTourForm, LogQuery, PreferencesForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{AuthGateway, SystemLogReader};
use crate::services::{ServiceResult, ensure_role, log_failure};
use crate::{ADMIN_ROLES, OPERATOR_ROLES};

pub async fn settings_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SettingsPageData>
where
    R: AuthGateway + ?Sized,
{
    ensure_role(user, OPERATOR_ROLES)?;

    let profile = repo
        .current_user()
        .await
        .map_err(log_failure("load the profile"))?;
    Ok(SettingsPageData { profile })
}

/// Applies the posted fields; absent fields keep their current value.
pub fn apply_preferences(prefs: &mut UiPreferences, form: &PreferencesForm) -> ServiceResult<()> {
    if let Some(language) = form.language.as_deref().filter(|v| !v.is_empty()) {
        prefs.language = Language::parse(language).map_err(|source| FormError::Invalid {
            field: "language",
            source,
        })?;
    }
    if let Some(theme) = form.theme.as_deref().filter(|v| !v.is_empty()) {
        prefs.theme = Theme::parse(theme).map_err(|source| FormError::Invalid {
            field: "theme",
            source,
        })?;
    }
    if let Some(collapsed) = form.sidebar_collapsed.as_deref() {
        prefs.sidebar_collapsed = matches!(collapsed, "true" | "on" | "1");
    }
    Ok(())
}

pub fn dismiss_tour(prefs: &mut UiPreferences, form: &DismissTourForm) {
    let page = form.page.trim();
    if !page.is_empty() {
        prefs.dismiss_tour(page);
    }
}

/// Local path to return to after a preference change; anything else goes home.
pub fn return_path(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

/// Newest entries first, filtered by source, description or IP.
pub async fn system_logs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &LogQuery,
) -> ServiceResult<LogsPageData>
where
    R: SystemLogReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut logs: Vec<_> = repo
        .list_system_logs()
        .await
        .map_err(log_failure("load system logs"))?
        .into_iter()
        .filter(|log| search.as_deref().is_none_or(|term| log.matches(term)))
        .collect();
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(LogsPageData {
        logs: Paginated::from_items(logs, query.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE),
        search,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::system_log::SystemErrorLog;
    use crate::domain::user::Role;
    use crate::services::ServiceError;
    use crate::services::fake::{FakeBackend, FakeState, timestamp};
    use crate::services::test_support::user;

    fn form(language: Option<&str>, theme: Option<&str>, collapsed: Option<&str>) -> PreferencesForm {
        PreferencesForm {
            language: language.map(str::to_string),
            theme: theme.map(str::to_string),
            sidebar_collapsed: collapsed.map(str::to_string),
            next: None,
        }
    }

    #[test]
    fn preferences_apply_only_posted_fields() {
        let mut prefs = UiPreferences::default();

        apply_preferences(&mut prefs, &form(Some("tr"), None, Some("true"))).unwrap();
        assert_eq!(prefs.language, Language::Tr);
        assert_eq!(prefs.theme, Theme::Light);
        assert!(prefs.sidebar_collapsed);

        apply_preferences(&mut prefs, &form(None, Some("dark"), None)).unwrap();
        assert_eq!(prefs.language, Language::Tr);
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.sidebar_collapsed);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let mut prefs = UiPreferences::default();
        let result = apply_preferences(&mut prefs, &form(Some("de"), None, None));

        assert!(matches!(result, Err(ServiceError::Form(ref key)) if key == "form_invalid_values"));
        assert_eq!(prefs, UiPreferences::default());
    }

    #[test]
    fn return_path_stays_local() {
        assert_eq!(return_path(Some("/records?page=2")), "/records?page=2");
        assert_eq!(return_path(Some("//evil.example")), "/");
        assert_eq!(return_path(Some("https://evil.example")), "/");
        assert_eq!(return_path(None), "/");
    }

    #[actix_web::test]
    async fn logs_are_searched_and_sorted() {
        let log = |id: i64, source: &str, at: &str| SystemErrorLog {
            id,
            ip_address: Some("10.0.0.1".to_string()),
            source_class: Some(source.to_string()),
            description: Some("boom".to_string()),
            timestamp: Some(timestamp(at)),
        };
        let repo = FakeBackend::new(FakeState {
            logs: vec![
                log(1, "RecordService", "2024-05-01 10:00:00"),
                log(2, "TemplateService", "2024-05-02 10:00:00"),
                log(3, "RecordService", "2024-05-03 10:00:00"),
            ],
            ..FakeState::default()
        });
        let query = LogQuery {
            search: Some("record".to_string()),
            page: None,
        };

        let page = system_logs(&repo, &user(Role::Admin), &query).await.unwrap();

        assert_eq!(page.logs.total, 2);
        assert_eq!(page.logs.items[0].id, 3);
        assert!(matches!(
            system_logs(&repo, &user(Role::Supervisor), &query).await,
            Err(ServiceError::Unauthorized)
        ));
    }
}
