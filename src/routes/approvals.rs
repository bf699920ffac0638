//! Approval queue and review actions.

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::qc_record::ManualResult;
use crate::forms::qc_record::{ApproveForm, NotesForm, RejectForm};
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::records::RecordRow;
use crate::routes::{action_result, base_context, page_error, preferences, render_template};
use crate::services::approval as approval_service;

/// Review forms post back either to the queue or to the record page.
#[derive(Deserialize)]
pub struct ReturnQuery {
    next: Option<String>,
}

impl ReturnQuery {
    fn back(&self, record_id: i64) -> String {
        match self.next.as_deref() {
            Some("record") => format!("/records/{record_id}"),
            _ => "/approvals".to_string(),
        }
    }
}

#[get("/approvals")]
pub async fn show_approvals(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context =
        base_context(&flash_messages, Some(&user), "approvals", &prefs, &server_config);

    match approval_service::approval_queue(&backend.for_user(&user), &user).await {
        Ok(data) => {
            let rows: Vec<RecordRow> = data.records.iter().map(RecordRow::new).collect();
            context.insert("rows", &rows);
            context.insert("results", &ManualResult::ALL);
            context.insert("refresh_secs", &server_config.approval_refresh_secs);
            render_template(&tera, "approvals/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

#[post("/records/{record_id}/approve")]
pub async fn approve_record(
    record_id: web::Path<i64>,
    query: web::Query<ReturnQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<ApproveForm>,
) -> impl Responder {
    let record_id = record_id.into_inner();
    let result =
        approval_service::approve(&backend.for_user(&user), &user, record_id, form).await;
    action_result(
        result,
        preferences(&session).language,
        "record_approved",
        &query.back(record_id),
    )
}

#[post("/records/{record_id}/reject")]
pub async fn reject_record(
    record_id: web::Path<i64>,
    query: web::Query<ReturnQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<RejectForm>,
) -> impl Responder {
    let record_id = record_id.into_inner();
    let result = approval_service::reject(&backend.for_user(&user), &user, record_id, form).await;
    action_result(
        result,
        preferences(&session).language,
        "record_rejected",
        &query.back(record_id),
    )
}

#[post("/records/{record_id}/notes")]
pub async fn update_notes(
    record_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<NotesForm>,
) -> impl Responder {
    let record_id = record_id.into_inner();
    let result =
        approval_service::update_notes(&backend.for_user(&user), &user, record_id, form).await;
    action_result(
        result,
        preferences(&session).language,
        "saved",
        &format!("/records/{record_id}"),
    )
}
