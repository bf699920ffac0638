//! Companies, locations, machines and products.

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::master_data::{CompanyForm, LocationForm, MachineForm, ProductForm};
use crate::models::config::ServerConfig;
use crate::repository::BackendRepository;
use crate::routes::{action_result, base_context, page_error, preferences, render_template};
use crate::services::{
    companies as companies_service, locations as locations_service,
    machines as machines_service, products as products_service,
};

#[get("/companies")]
pub async fn show_companies(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "companies", &prefs, &server_config);

    match companies_service::list_companies(&backend.for_user(&user), &user).await {
        Ok(data) => {
            context.insert("companies", &data.companies);
            render_template(&tera, "companies/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

#[post("/companies")]
pub async fn create_company(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<CompanyForm>,
) -> impl Responder {
    let result = companies_service::create_company(&backend.for_user(&user), &user, form).await;
    action_result(result, preferences(&session).language, "saved", "/companies")
}

#[post("/companies/{company_id}")]
pub async fn update_company(
    company_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<CompanyForm>,
) -> impl Responder {
    let result = companies_service::update_company(
        &backend.for_user(&user),
        &user,
        company_id.into_inner(),
        form,
    )
    .await;
    action_result(result, preferences(&session).language, "saved", "/companies")
}

#[post("/companies/{company_id}/delete")]
pub async fn delete_company(
    company_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let result =
        companies_service::delete_company(&backend.for_user(&user), &user, company_id.into_inner())
            .await;
    action_result(result, preferences(&session).language, "deleted", "/companies")
}

#[derive(Deserialize)]
struct LocationsQuery {
    inactive: Option<String>,
}

#[get("/locations")]
pub async fn show_locations(
    query: web::Query<LocationsQuery>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "locations", &prefs, &server_config);
    let show_inactive = query.inactive.as_deref().is_some_and(|v| v == "1");

    match locations_service::list_locations(&backend.for_user(&user), &user, show_inactive).await {
        Ok(data) => {
            // Every row is rendered; the toggle only hides inactive ones.
            context.insert("locations", &data.all);
            context.insert("visible_count", &data.visible().len());
            context.insert("companies", &data.companies);
            context.insert("show_inactive", &data.show_inactive);
            render_template(&tera, "locations/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

#[post("/locations")]
pub async fn create_location(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<LocationForm>,
) -> impl Responder {
    let result = locations_service::create_location(&backend.for_user(&user), &user, form).await;
    action_result(result, preferences(&session).language, "saved", "/locations")
}

#[post("/locations/{location_id}")]
pub async fn update_location(
    location_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<LocationForm>,
) -> impl Responder {
    let result = locations_service::update_location(
        &backend.for_user(&user),
        &user,
        location_id.into_inner(),
        form,
    )
    .await;
    action_result(result, preferences(&session).language, "saved", "/locations")
}

#[post("/locations/{location_id}/delete")]
pub async fn delete_location(
    location_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let result = locations_service::delete_location(
        &backend.for_user(&user),
        &user,
        location_id.into_inner(),
    )
    .await;
    action_result(result, preferences(&session).language, "deleted", "/locations")
}

#[get("/machines")]
pub async fn show_machines(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "machines", &prefs, &server_config);

    match machines_service::list_machines(&backend.for_user(&user), &user).await {
        Ok(data) => {
            let statuses: Vec<&str> = data.machines.iter().map(|m| m.status_label()).collect();
            context.insert("machines", &data.machines);
            context.insert("statuses", &statuses);
            context.insert("locations", &data.locations);
            render_template(&tera, "machines/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

#[post("/machines")]
pub async fn create_machine(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<MachineForm>,
) -> impl Responder {
    let result = machines_service::create_machine(&backend.for_user(&user), &user, form).await;
    action_result(result, preferences(&session).language, "saved", "/machines")
}

#[post("/machines/{machine_id}")]
pub async fn update_machine(
    machine_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<MachineForm>,
) -> impl Responder {
    let result = machines_service::update_machine(
        &backend.for_user(&user),
        &user,
        machine_id.into_inner(),
        form,
    )
    .await;
    action_result(result, preferences(&session).language, "saved", "/machines")
}

#[derive(Deserialize)]
pub struct MaintenanceForm {
    enabled: String,
}

#[post("/machines/{machine_id}/maintenance")]
pub async fn toggle_maintenance(
    machine_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<MaintenanceForm>,
) -> impl Responder {
    let enabled = form.enabled == "true";
    let result = machines_service::set_maintenance(
        &backend.for_user(&user),
        &user,
        machine_id.into_inner(),
        enabled,
    )
    .await;
    let key = if enabled { "maintenance_on" } else { "maintenance_off" };
    action_result(result, preferences(&session).language, key, "/machines")
}

#[post("/machines/{machine_id}/delete")]
pub async fn delete_machine(
    machine_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let result =
        machines_service::delete_machine(&backend.for_user(&user), &user, machine_id.into_inner())
            .await;
    action_result(result, preferences(&session).language, "deleted", "/machines")
}

#[get("/products")]
pub async fn show_products(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let prefs = preferences(&session);
    let mut context = base_context(&flash_messages, Some(&user), "products", &prefs, &server_config);

    match products_service::list_products(&backend.for_user(&user), &user).await {
        Ok(data) => {
            context.insert("products", &data.products);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => page_error(err, &tera, context, prefs.language, "/"),
    }
}

#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let result = products_service::create_product(&backend.for_user(&user), &user, form).await;
    action_result(result, preferences(&session).language, "saved", "/products")
}

#[post("/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let result = products_service::update_product(
        &backend.for_user(&user),
        &user,
        product_id.into_inner(),
        form,
    )
    .await;
    action_result(result, preferences(&session).language, "saved", "/products")
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i64>,
    user: AuthenticatedUser,
    session: Session,
    backend: web::Data<BackendRepository>,
) -> impl Responder {
    let result =
        products_service::delete_product(&backend.for_user(&user), &user, product_id.into_inner())
            .await;
    action_result(result, preferences(&session).language, "deleted", "/products")
}
