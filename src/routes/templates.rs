//! Template list and builder.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::domain::qc_template::{ContextType, InputType};
use crate::dto::qc::{BuilderOutcome, BuilderPageData};
use crate::i18n::translate;
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{
    action_error, action_result, base_context, flash_success, page_error, preferences, redirect,
    render_template,
};
use crate::services::qc_templates as templates_service;

#[derive(Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

#[get("/templates")]
pub async fn show_templates(
    query: web::Query<SearchQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "templates", &prefs, &server_config);

    match templates_service::list_templates(
        &backend.for_user(&user),
        &user,
        query.into_inner().search,
    )
    .await
    {
        Ok(data) => {
            let point_counts: Vec<usize> = data
                .templates
                .iter()
                .map(|t| t.control_point_count())
                .collect();
            context.insert("templates", &data.templates);
            context.insert("point_counts", &point_counts);
            context.insert("search", &data.search);
            render_template(&tera, "templates/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

fn render_builder(
    tera: &Tera,
    mut context: Context,
    page: &BuilderPageData,
    error: Option<&str>,
) -> HttpResponse {
    let authoring = InputType::AUTHORING;
    let input_types: Vec<&str> = authoring.iter().map(InputType::as_str).collect();
    let context_types: Vec<&str> = ContextType::ALL.iter().map(|c| c.as_str()).collect();
    let action = match page.template_id {
        Some(id) => format!("/templates/{id}/edit"),
        None => "/templates/new".to_string(),
    };

    context.insert("template_id", &page.template_id);
    context.insert("header", &page.header);
    context.insert("points", &page.points);
    context.insert("products", &page.products);
    context.insert("machines", &page.machines);
    context.insert("input_types", &input_types);
    context.insert("context_types", &context_types);
    context.insert("form_action", &action);
    context.insert("builder_error", &error);
    render_template(tera, "templates/builder.html", &context)
}

#[get("/templates/new")]
pub async fn new_template(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let context = base_context(&flash_messages, Some(&user), "templates", &prefs, &server_config);

    match templates_service::load_builder(&backend.for_user(&user), &user, None).await {
        Ok(page) => render_builder(&tera, context, &page, None),
        Err(err) => page_error(err, &tera, context, prefs.language, "/templates"),
    }
}

#[get("/templates/{template_id}/edit")]
pub async fn edit_template(
    template_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let context = base_context(&flash_messages, Some(&user), "templates", &prefs, &server_config);

    match templates_service::load_builder(
        &backend.for_user(&user),
        &user,
        Some(template_id.into_inner()),
    )
    .await
    {
        Ok(page) => render_builder(&tera, context, &page, None),
        Err(err) => page_error(err, &tera, context, prefs.language, "/templates"),
    }
}

#[allow(clippy::too_many_arguments)]
async fn post_builder(
    template_id: Option<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> HttpResponse {
    let prefs = preferences(&session);
    let lang = prefs.language;
    let back = match template_id {
        Some(id) => format!("/templates/{id}/edit"),
        None => "/templates/new".to_string(),
    };

    match templates_service::save_template(&backend.for_user(&user), &user, template_id, &body)
        .await
    {
        Ok(BuilderOutcome::Saved(template)) => {
            log::debug!("Builder saved template {}", template.id);
            flash_success(lang, "template_saved");
            redirect("/templates")
        }
        Ok(BuilderOutcome::Rerender { page, error }) => {
            let context =
                base_context(&flash_messages, Some(&user), "templates", &prefs, &server_config);
            render_builder(&tera, context, &page, error.map(|key| translate(lang, key)))
        }
        Err(err) => action_error(err, lang, &back),
    }
}

#[post("/templates/new")]
pub async fn create_template(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    post_builder(None, user, session, backend, flash_messages, server_config, tera, body).await
}

#[post("/templates/{template_id}/edit")]
pub async fn update_template(
    template_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    post_builder(
        Some(template_id.into_inner()),
        user,
        session,
        backend,
        flash_messages,
        server_config,
        tera,
        body,
    )
    .await
}

#[post("/templates/{template_id}/delete")]
pub async fn delete_template(
    template_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let result =
        templates_service::delete_template(&backend.for_user(&user), &user, template_id.into_inner())
            .await;
    action_result(result, preferences(&session).language, "deleted", "/templates")
}
