//! HTTP handlers and the helpers they share.
//!
//! Handlers stay thin: extract, call a service, then render or redirect.
//! Every user-facing message is a catalog key translated with the visitor's
//! language preference.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::domain::preferences::{Language, UiPreferences};
use crate::domain::user::Role;
use crate::dto::qc::ExportFile;
use crate::i18n::{catalog_map, translate};
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

pub mod approvals;
pub mod auth;
pub mod dashboard;
pub mod master_data;
pub mod operator;
pub mod records;
pub mod settings;
pub mod templates;
pub mod users;

const PREFERENCES_KEY: &str = "prefs";
/// Sign-in page after the backend refused our token.
pub const EXPIRED_LOGIN: &str = "/login?expired=1";

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    render_with_status(tera, template, context, StatusCode::OK)
}

pub fn render_with_status(
    tera: &Tera,
    template: &str,
    context: &Context,
    status: StatusCode,
) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Preferences of this browser session; defaults when none were saved.
pub fn preferences(session: &Session) -> UiPreferences {
    session
        .get::<UiPreferences>(PREFERENCES_KEY)
        .unwrap_or_else(|e| {
            log::warn!("Discarding unreadable preferences: {e}");
            None
        })
        .unwrap_or_default()
}

pub fn store_preferences(session: &Session, prefs: &UiPreferences) {
    if let Err(e) = session.insert(PREFERENCES_KEY, prefs) {
        log::error!("Failed to store preferences: {e}");
    }
}

#[derive(Serialize)]
struct CurrentUser<'a> {
    name: &'a str,
    username: &'a str,
    role: Role,
    is_admin: bool,
    can_review: bool,
}

/// Context shared by every page: alerts, user, catalog and UI settings.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
    prefs: &UiPreferences,
    config: &ServerConfig,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    if let Some(user) = user {
        context.insert(
            "current_user",
            &CurrentUser {
                name: &user.name,
                username: &user.username,
                role: user.role,
                is_admin: user.role == Role::Admin,
                can_review: user.role.can_review(),
            },
        );
    }
    context.insert("current_page", current_page);
    context.insert("t", &catalog_map(prefs.language));
    context.insert("lang", prefs.language.code());
    context.insert("theme", &prefs.theme);
    context.insert("sidebar_collapsed", &prefs.sidebar_collapsed);
    context.insert("show_tour", &prefs.show_tour(current_page));
    context.insert("search_debounce_ms", &config.search_debounce_ms);
    context
}

pub fn flash_success(lang: Language, key: &str) {
    FlashMessage::success(translate(lang, key)).send();
}

pub fn flash_error(lang: Language, key: &str) {
    FlashMessage::error(translate(lang, key)).send();
}

/// Flashes `success_key` and redirects to `back`, or reports the failure.
pub fn action_result<T>(
    result: ServiceResult<T>,
    lang: Language,
    success_key: &str,
    back: &str,
) -> HttpResponse {
    match result {
        Ok(_) => {
            flash_success(lang, success_key);
            redirect(back)
        }
        Err(err) => action_error(err, lang, back),
    }
}

/// Flashes the failure of a POST action and redirects.
pub fn action_error(err: ServiceError, lang: Language, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            flash_error(lang, "not_enough_rights");
            redirect("/na")
        }
        ServiceError::SessionExpired => {
            FlashMessage::warning(translate(lang, "session_expired")).send();
            redirect(EXPIRED_LOGIN)
        }
        ServiceError::Connection(_) => {
            flash_error(lang, "backend_unreachable");
            redirect(back)
        }
        ServiceError::Form(key) => {
            flash_error(lang, &key);
            redirect(back)
        }
        ServiceError::NotFound => {
            flash_error(lang, "not_found");
            redirect(back)
        }
        err => {
            log::error!("Request failed: {err}");
            flash_error(lang, "error_occurred");
            redirect(back)
        }
    }
}

/// Handles the failure of a page load.
///
/// Backend outages render the error page in place instead of redirecting,
/// since the target page would fail the same way.
pub fn page_error(
    err: ServiceError,
    tera: &Tera,
    mut context: Context,
    lang: Language,
    back: &str,
) -> HttpResponse {
    let (status, key) = match err {
        ServiceError::Connection(_) => (StatusCode::SERVICE_UNAVAILABLE, "backend_unreachable"),
        ServiceError::Repository(_) | ServiceError::Internal(_) => {
            log::error!("Page failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "error_occurred")
        }
        other => return action_error(other, lang, back),
    };
    context.insert("error_message", translate(lang, key));
    context.insert("back_url", back);
    render_with_status(tera, "error.html", &context, status)
}

/// Sends a generated export as a download.
pub fn attachment(file: ExportFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name)],
        })
        .body(file.bytes)
}
