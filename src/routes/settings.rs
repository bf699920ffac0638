//! Preferences, profile and the system log viewer.

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::settings::{DismissTourForm, LogQuery, PreferencesForm};
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{
    action_error, base_context, page_error, preferences, redirect, render_template,
    store_preferences,
};
use crate::services::settings as settings_service;

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "settings", &prefs, &server_config);

    match settings_service::settings_page(&backend.for_user(&user), &user).await {
        Ok(data) => {
            context.insert("profile", &data.profile);
            render_template(&tera, "settings/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

/// Language, theme and sidebar toggles posted from any page.
#[post("/settings/preferences")]
pub async fn save_preferences(
    _user: AuthenticatedUser,
    session: Session,
    web::Form(form): web::Form<PreferencesForm>,
) -> impl Responder {
    let mut prefs = preferences(&session);
    let back = settings_service::return_path(form.next.as_deref()).to_string();

    match settings_service::apply_preferences(&mut prefs, &form) {
        Ok(()) => {
            store_preferences(&session, &prefs);
            redirect(&back)
        }
        Err(err) => action_error(err, prefs.language, &back),
    }
}

#[post("/settings/tour")]
pub async fn dismiss_tour(
    _user: AuthenticatedUser,
    session: Session,
    web::Form(form): web::Form<DismissTourForm>,
) -> impl Responder {
    let mut prefs = preferences(&session);
    settings_service::dismiss_tour(&mut prefs, &form);
    store_preferences(&session, &prefs);
    redirect(settings_service::return_path(form.next.as_deref()))
}

#[get("/settings/logs")]
pub async fn show_logs(
    query: web::Query<LogQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "logs", &prefs, &server_config);

    match settings_service::system_logs(&backend.for_user(&user), &user, &query).await {
        Ok(data) => {
            context.insert("logs", &data.logs);
            context.insert("search", &data.search);
            render_template(&tera, "settings/logs.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/settings"),
    }
}
