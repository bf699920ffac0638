use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::user::Role;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{base_context, page_error, preferences, redirect, render_template};
use crate::services::dashboard as dashboard_service;

#[get("/")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.role == Role::Operator {
        return redirect("/m/");
    }

    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "dashboard", &prefs, &server_config);

    match dashboard_service::admin_dashboard(&backend.for_user(&user), &user).await {
        Ok(dashboard) => {
            context.insert("dashboard", &dashboard);
            render_template(&tera, "dashboard/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/settings"),
    }
}
