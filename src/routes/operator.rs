//! Operator console mounted under `/m`.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::dto::operator::EntryOutcome;
use crate::forms::qc_entry::EntryQuery;
use crate::i18n::translate;
use crate::models::config::ServerConfig;
use crate::repository::{BackendRepository, DieselRepository};
use crate::routes::records::RecordRow;
use crate::routes::{
    action_error, action_result, base_context, flash_success, page_error, preferences, redirect,
    render_template,
};
use crate::services::operator as operator_service;

fn entry_path(template_id: i64, machine_id: i64) -> String {
    format!("/m/entry/{template_id}/{machine_id}")
}

fn entry_url(template_id: i64, machine_id: i64, task_id: Option<i64>, sample: Option<u32>) -> String {
    let mut params = Vec::new();
    if let Some(task_id) = task_id {
        params.push(format!("task_id={task_id}"));
    }
    if let Some(sample) = sample {
        params.push(format!("sample={sample}"));
    }
    let path = entry_path(template_id, machine_id);
    if params.is_empty() {
        path
    } else {
        format!("{path}?{}", params.join("&"))
    }
}

#[get("/")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    drafts: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "operator", &prefs, &server_config);

    match operator_service::operator_dashboard(
        &backend.for_user(&user),
        drafts.get_ref(),
        &user,
        Local::now().naive_local(),
        server_config.grace_period(),
    )
    .await
    {
        Ok(data) => {
            context.insert("tasks", &data.tasks);
            context.insert("machines", &data.machines);
            context.insert("drafts", &data.drafts);
            render_template(&tera, "m/dashboard.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/settings"),
    }
}

#[get("/machines/{machine_id}")]
pub async fn show_machine_templates(
    machine_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "operator", &prefs, &server_config);

    match operator_service::machine_templates(
        &backend.for_user(&user),
        &user,
        machine_id.into_inner(),
    )
    .await
    {
        Ok(data) => {
            context.insert("machine", &data.machine);
            context.insert("templates", &data.templates);
            render_template(&tera, "m/templates.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/m/"),
    }
}

#[get("/entry/{template_id}/{machine_id}")]
#[allow(clippy::too_many_arguments)]
pub async fn show_entry(
    path: web::Path<(i64, i64)>,
    query: web::Query<EntryQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    drafts: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (template_id, machine_id) = path.into_inner();
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "entry", &prefs, &server_config);

    match operator_service::entry_page(
        &backend.for_user(&user),
        drafts.get_ref(),
        &user,
        template_id,
        machine_id,
        &query,
        Local::now().naive_local(),
        server_config.grace_period(),
    )
    .await
    {
        Ok(page) => {
            context.insert("window_open", &page.window_open());
            context.insert("template", &page.template);
            context.insert("machine", &page.machine);
            context.insert("task", &page.task);
            context.insert("plain_sections", &page.plain_sections);
            context.insert("grids", &page.grids);
            context.insert("values", &page.values);
            context.insert("notes", &page.notes);
            context.insert("progress", &page.progress);
            context.insert("progress_percent", &page.progress.percent());
            context.insert("has_draft", &page.has_draft);
            context.insert("task_id", &query.task_id);
            context.insert(
                "form_action",
                &entry_url(template_id, machine_id, query.task_id, None),
            );
            context.insert("discard_action", &format!("{}/discard", entry_path(template_id, machine_id)));
            render_template(&tera, "m/entry.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/m/"),
    }
}

#[derive(Deserialize)]
pub struct TaskQuery {
    task_id: Option<i64>,
}

#[post("/entry/{template_id}/{machine_id}")]
#[allow(clippy::too_many_arguments)]
pub async fn save_entry(
    path: web::Path<(i64, i64)>,
    query: web::Query<TaskQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    drafts: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    body: web::Bytes,
) -> HttpResponse {
    let (template_id, machine_id) = path.into_inner();
    let lang = preferences(&session).language;
    let task_id = query.task_id;
    let back = entry_url(template_id, machine_id, task_id, None);

    let outcome = operator_service::save_entry(
        &backend.for_user(&user),
        drafts.get_ref(),
        &user,
        template_id,
        machine_id,
        task_id,
        &body,
        Local::now().naive_local(),
        server_config.grace_period(),
    )
    .await;

    match outcome {
        Ok(EntryOutcome::DraftSaved { sample: None }) => {
            flash_success(lang, "draft_saved");
            redirect(&back)
        }
        Ok(EntryOutcome::DraftSaved { sample }) => {
            redirect(&entry_url(template_id, machine_id, task_id, sample))
        }
        Ok(EntryOutcome::Submitted {
            record,
            missing,
            late,
        }) => {
            log::debug!("Operator entry stored as record {}", record.id);
            flash_success(lang, "record_submitted");
            if !missing.is_empty() {
                FlashMessage::warning(format!(
                    "{}: {}",
                    translate(lang, "entry_missing_required"),
                    missing.join(", ")
                ))
                .send();
            }
            if late {
                FlashMessage::warning(translate(lang, "submitted_late")).send();
            }
            redirect("/m/")
        }
        Err(err) => action_error(err, lang, &back),
    }
}

#[post("/entry/{template_id}/{machine_id}/discard")]
pub async fn discard_draft(
    path: web::Path<(i64, i64)>,
    user: AuthenticatedUser,
    session: Session,
    drafts: web::Data<DieselRepository>,
) -> impl Responder {
    let (template_id, machine_id) = path.into_inner();
    let result =
        operator_service::discard_draft(drafts.get_ref(), &user, template_id, machine_id).await;
    action_result(result, preferences(&session).language, "draft_discarded", "/m/")
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    page: Option<usize>,
}

#[get("/history")]
pub async fn show_history(
    query: web::Query<HistoryQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "history", &prefs, &server_config);

    match operator_service::history(&backend.for_user(&user), &user, query.page).await {
        Ok(data) => {
            let rows: Vec<RecordRow> = data.records.items.iter().map(RecordRow::new).collect();
            context.insert("rows", &rows);
            context.insert("records", &data.records);
            render_template(&tera, "m/history.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/m/"),
    }
}
