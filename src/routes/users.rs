use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::user::Role;
use crate::dto::master_data::UsersQuery;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{action_result, base_context, page_error, preferences, render_template};
use crate::services::users as users_service;

#[get("/users")]
pub async fn show_users(
    query: web::Query<UsersQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "users", &prefs, &server_config);

    match users_service::list_users(&backend.for_user(&user), &user, query.into_inner()).await {
        Ok(data) => {
            context.insert("users", &data.users);
            context.insert("machines", &data.machines);
            context.insert("search", &data.search);
            context.insert("role", &data.role);
            context.insert("roles", &Role::ALL);
            render_template(&tera, "users/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

/// The user dialog posts repeated `machine_ids`, so the body is read raw.
#[post("/users")]
pub async fn create_user(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    body: web::Bytes,
) -> impl Responder {
    let result = users_service::create_user(&backend.for_user(&user), &user, &body).await;
    action_result(result, preferences(&session).language, "saved", "/users")
}

#[post("/users/{user_id}")]
pub async fn update_user(
    user_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    body: web::Bytes,
) -> impl Responder {
    let result =
        users_service::update_user(&backend.for_user(&user), &user, user_id.into_inner(), &body)
            .await;
    action_result(result, preferences(&session).language, "saved", "/users")
}

#[post("/users/{user_id}/delete")]
pub async fn delete_user(
    user_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let result =
        users_service::delete_user(&backend.for_user(&user), &user, user_id.into_inner()).await;
    action_result(result, preferences(&session).language, "deleted", "/users")
}
