//! Sign-in, sign-out and the "not allowed" page.

use actix_identity::Identity;
use actix_session::Session;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::auth::LoginForm;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{
    action_error, base_context, flash_error, preferences, redirect, render_template,
};
use crate::services::auth as auth_service;

#[derive(Deserialize)]
struct LoginQuery {
    expired: Option<String>,
}

#[get("/login")]
pub async fn login_page(
    query: web::Query<LoginQuery>,
    identity: Option<Identity>,
    user: Option<AuthenticatedUser>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if query.expired.is_some() {
        if let Some(identity) = identity {
            identity.logout();
        }
    } else if let Some(user) = user {
        return redirect(auth_service::landing_path(&user));
    }

    let prefs = preferences(&session);
    let context = base_context(&flash_messages, None, "login", &prefs, &server_config);
    render_template(&tera, "login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    session: Session,
    backend: web::Data<BackendRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let lang = preferences(&session).language;

    let user = match auth_service::login(backend.get_ref(), form).await {
        Ok(user) => user,
        Err(err) => return action_error(err, lang, "/login"),
    };

    let token = match user.to_jwt(&server_config.secret) {
        Ok(token) => token,
        Err(e) => {
            log::error!("Failed to sign identity token: {e}");
            flash_error(lang, "error_occurred");
            return redirect("/login");
        }
    };
    if let Err(e) = Identity::login(&req.extensions(), token) {
        log::error!("Failed to store identity: {e}");
        flash_error(lang, "error_occurred");
        return redirect("/login");
    }

    redirect(auth_service::landing_path(&user))
}

#[post("/logout")]
pub async fn logout(identity: Identity) -> impl Responder {
    identity.logout();
    redirect("/login")
}

#[get("/na")]
pub async fn not_allowed(
    user: AuthenticatedUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "na", &prefs, &server_config);
    context.insert("home_url", auth_service::landing_path(&user));
    render_template(&tera, "na.html", &context)
}
