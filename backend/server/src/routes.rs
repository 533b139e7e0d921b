use crate::config::DemoApp;
use crate::error::ApiError;
use crate::handlers;
use actix_web::web;

const HELLO_ENDPOINTS: &[&str] = &["/", "/health"];
const VOLUMES_ENDPOINTS: &[&str] = &["/health", "/", "/named", "/bind", "/tmpfs"];
const NETDEMO_ENDPOINTS: &[&str] = &["/health", "/", "/db", "/cache", "/network-info"];
const MULTI_SERVICE_ENDPOINTS: &[&str] = &["/health", "/", "/users", "/cache/{key}"];
const TASKAPP_ENDPOINTS: &[&str] = &["/api/health", "/api/tasks", "/api/tasks/{id}"];

pub fn endpoints(app: DemoApp) -> &'static [&'static str] {
    match app {
        DemoApp::Hello => HELLO_ENDPOINTS,
        DemoApp::Volumes => VOLUMES_ENDPOINTS,
        DemoApp::NetDemo => NETDEMO_ENDPOINTS,
        DemoApp::MultiService => MULTI_SERVICE_ENDPOINTS,
        DemoApp::TaskApp => TASKAPP_ENDPOINTS,
    }
}

/// Route table for `app`, plus JSON/path extractor errors rendered as 400s and
/// a 404 fallback.
pub fn configure(app: DemoApp) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::BadRequest(format!("Invalid JSON body: {}", err)).into()
        }))
        .app_data(
            web::PathConfig::default()
                .error_handler(|_err, _req| ApiError::BadRequest("invalid id".to_string()).into()),
        );

        match app {
            DemoApp::Hello => configure_hello(cfg),
            DemoApp::Volumes => configure_volumes(cfg),
            DemoApp::NetDemo => configure_netdemo(cfg),
            DemoApp::MultiService => configure_multi_service(cfg),
            DemoApp::TaskApp => configure_taskapp(cfg),
        }

        cfg.default_service(web::to(handlers::not_found));
    }
}

fn configure_hello(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::liveness))
        .route("/", web::get().to(handlers::info::hello));
}

fn configure_volumes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::status_only))
        .route("/", web::get().to(handlers::info::volumes_info))
        .route("/named", web::get().to(handlers::volumes::named))
        .route("/bind", web::get().to(handlers::volumes::bind))
        .route("/tmpfs", web::get().to(handlers::volumes::tmpfs));
}

fn configure_netdemo(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::liveness))
        .route("/", web::get().to(handlers::info::netdemo_info))
        // Raw TCP probes across the backend network
        .route("/db", web::get().to(handlers::network::probe_database))
        .route("/cache", web::get().to(handlers::network::probe_cache))
        .route("/network-info", web::get().to(handlers::network::network_info));
}

fn configure_multi_service(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::dependency_health))
        .route("/", web::get().to(handlers::info::service_info))
        // Users (PostgreSQL)
        .route("/users", web::get().to(handlers::users::list_users))
        .route("/users", web::post().to(handlers::users::create_user))
        // Cache (Redis)
        .route("/cache/{key}", web::get().to(handlers::cache::get_entry))
        .route("/cache/{key}", web::put().to(handlers::cache::put_entry));
}

fn configure_taskapp(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(handlers::health::dependency_health))
        .route("/api/tasks", web::get().to(handlers::tasks::list_tasks))
        .route("/api/tasks", web::post().to(handlers::tasks::create_task))
        .route("/api/tasks/{id}", web::get().to(handlers::tasks::get_task))
        .route("/api/tasks/{id}", web::put().to(handlers::tasks::update_task))
        .route("/api/tasks/{id}", web::delete().to(handlers::tasks::delete_task));
}
