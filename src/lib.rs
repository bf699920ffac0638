#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

use crate::domain::user::Role;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::{BackendRepository, DieselRepository};

#[cfg(feature = "server")]
pub mod auth;
pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod export;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod i18n;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
#[cfg(feature = "server")]
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Master data, users and system logs.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];
/// The admin console: dashboard, templates, records and approvals.
pub const CONSOLE_ROLES: &[Role] = &[Role::Admin, Role::Supervisor];
/// The operator console is open to every signed-in user.
pub const OPERATOR_ROLES: &[Role] = &Role::ALL;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    use crate::routes::{
        approvals, auth as auth_routes, dashboard, master_data, operator, records, settings,
        templates, users,
    };

    // Local SQLite store for operator drafts.
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;
    db::prepare_draft_store(&pool)
        .map_err(|e| std::io::Error::other(format!("Failed to prepare draft store: {e}")))?;
    let drafts = DieselRepository::new(pool);

    let backend =
        BackendRepository::new(&server_config.backend_url, server_config.request_timeout())
            .map_err(|e| std::io::Error::other(format!("Failed to create backend client: {e}")))?;
    log::info!("Using QC backend at {}", backend.base_url());

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid secret: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(auth_routes::login_page)
            .service(auth_routes::login)
            .service(
                web::scope("/m")
                    .wrap(RedirectUnauthorized)
                    .service(operator::show_dashboard)
                    .service(operator::show_machine_templates)
                    .service(operator::discard_draft)
                    .service(operator::show_entry)
                    .service(operator::save_entry)
                    .service(operator::show_history),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(auth_routes::logout)
                    .service(auth_routes::not_allowed)
                    .service(dashboard::show_dashboard)
                    .service(master_data::show_companies)
                    .service(master_data::create_company)
                    .service(master_data::update_company)
                    .service(master_data::delete_company)
                    .service(master_data::show_locations)
                    .service(master_data::create_location)
                    .service(master_data::update_location)
                    .service(master_data::delete_location)
                    .service(master_data::show_machines)
                    .service(master_data::create_machine)
                    .service(master_data::update_machine)
                    .service(master_data::toggle_maintenance)
                    .service(master_data::delete_machine)
                    .service(master_data::show_products)
                    .service(master_data::create_product)
                    .service(master_data::update_product)
                    .service(master_data::delete_product)
                    .service(users::show_users)
                    .service(users::create_user)
                    .service(users::update_user)
                    .service(users::delete_user)
                    .service(templates::show_templates)
                    .service(templates::new_template)
                    .service(templates::create_template)
                    .service(templates::edit_template)
                    .service(templates::update_template)
                    .service(templates::delete_template)
                    .service(records::show_records)
                    .service(records::export_records_csv)
                    .service(records::export_records_pdf)
                    .service(records::show_record)
                    .service(records::export_record_pdf)
                    .service(records::delete_record)
                    .service(approvals::show_approvals)
                    .service(approvals::approve_record)
                    .service(approvals::reject_record)
                    .service(approvals::update_notes)
                    .service(settings::show_settings)
                    .service(settings::save_preferences)
                    .service(settings::dismiss_tour)
                    .service(settings::show_logs),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(backend.clone()))
            .app_data(web::Data::new(drafts.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
