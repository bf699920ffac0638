//! Record list, detail and exports.

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Serialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::preferences::Language;
use crate::domain::qc_record::{ManualResult, QcFormRecord, RecordStatus};
use crate::forms::qc_record::RecordListParams;
use crate::i18n::translate;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{
    action_error, action_result, attachment, base_context, page_error, preferences,
    render_template,
};
use crate::services::qc_records as records_service;

/// A record with the labels the list and review pages show.
#[derive(Serialize)]
pub struct RecordRow<'a> {
    pub record: &'a QcFormRecord,
    pub code: &'a str,
    pub template: &'a str,
    pub subject: &'a str,
    pub date: Option<String>,
}

impl<'a> RecordRow<'a> {
    pub fn new(record: &'a QcFormRecord) -> Self {
        Self {
            record,
            code: record.code(),
            template: record.template_label(),
            subject: record.subject(),
            date: record
                .display_date()
                .map(|d| d.format("%d.%m.%Y %H:%M").to_string()),
        }
    }
}

#[derive(Serialize)]
struct ValueRow {
    label: String,
    value: String,
    result: Option<String>,
}

fn value_rows(record: &QcFormRecord, lang: Language) -> Vec<ValueRow> {
    let sample_word = translate(lang, "sample");
    record
        .values
        .iter()
        .map(|v| ValueRow {
            label: v.display_label(sample_word),
            value: v.display_value(),
            result: v.result.clone(),
        })
        .collect()
}

/// Query string carrying the active filter over to pagination and exports.
fn list_query(params: &RecordListParams) -> String {
    #[derive(Serialize)]
    struct Filter<'a> {
        status: Option<&'a str>,
        search: Option<&'a str>,
    }

    serde_html_form::to_string(Filter {
        status: params.status().map(RecordStatus::as_str),
        search: params.search(),
    })
    .unwrap_or_default()
}

#[get("/records")]
pub async fn show_records(
    params: web::Query<RecordListParams>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "records", &prefs, &server_config);

    match records_service::list_records(&backend.for_user(&user), &user, &params).await {
        Ok(data) => {
            let rows: Vec<RecordRow> = data.records.items.iter().map(RecordRow::new).collect();
            context.insert("rows", &rows);
            context.insert("records", &data.records);
            context.insert("status", &data.status);
            context.insert("search", &data.search);
            context.insert("statuses", &RecordStatus::ALL);
            context.insert("query", &list_query(&params));
            render_template(&tera, "records/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

#[get("/records/export.csv")]
pub async fn export_records_csv(
    params: web::Query<RecordListParams>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let lang = preferences(&session).language;
    match records_service::export_records_csv(&backend.for_user(&user), &user, &params, lang).await
    {
        Ok(file) => attachment(file),
        Err(err) => action_error(err, lang, "/records"),
    }
}

#[get("/records/export.pdf")]
pub async fn export_records_pdf(
    params: web::Query<RecordListParams>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let lang = preferences(&session).language;
    match records_service::export_records_pdf(&backend.for_user(&user), &user, &params, lang).await
    {
        Ok(file) => attachment(file),
        Err(err) => action_error(err, lang, "/records"),
    }
}

#[get("/records/{record_id}")]
pub async fn show_record(
    record_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "records", &prefs, &server_config);

    match records_service::record_detail(&backend.for_user(&user), &user, record_id.into_inner())
        .await
    {
        Ok(data) => {
            context.insert("row", &RecordRow::new(&data.record));
            context.insert("values", &value_rows(&data.record, prefs.language));
            context.insert("stepper", &data.stepper);
            context.insert("can_review", &data.can_review);
            context.insert("results", &ManualResult::ALL);
            render_template(&tera, "records/show.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/records"),
    }
}

#[get("/records/{record_id}/pdf")]
pub async fn export_record_pdf(
    record_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let lang = preferences(&session).language;
    let record_id = record_id.into_inner();
    match records_service::export_record_pdf(&backend.for_user(&user), &user, record_id, lang).await
    {
        Ok(file) => attachment(file),
        Err(err) => action_error(err, lang, &format!("/records/{record_id}")),
    }
}

#[post("/records/{record_id}/delete")]
pub async fn delete_record(
    record_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let result =
        records_service::delete_record(&backend.for_user(&user), &user, record_id.into_inner())
            .await;
    action_result(result, preferences(&session).language, "deleted", "/records")
}
