use crate::routes;
use crate::state::AppState;
use actix_web::{HttpResponse, web};
use serde_json::json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Machine hostname as reported by the OS.
pub fn hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

pub async fn hello(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Hello from Docker!",
        "hostname": hostname(),
        "platform": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "version": VERSION,
        "environment": state.config.environment.as_deref().unwrap_or("unknown"),
    }))
}

pub async fn service_info(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": state.config.app.service_name(),
        "version": VERSION,
        "environment": state.config.environment,
        "hostname": hostname(),
    }))
}

pub async fn netdemo_info(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": state.config.app.service_name(),
        "version": VERSION,
        "container": {
            "hostname": hostname(),
            "pid": std::process::id(),
        },
        "networks": {
            "description": "This container is on BOTH frontend and backend networks.",
            "frontend": "Reachable by nginx proxy.",
            "backend": format!("Used to reach {} and {}.", state.config.db_host, state.config.redis_host),
        },
        "endpoints": routes::endpoints(state.config.app),
    }))
}

pub async fn volumes_info(state: web::Data<AppState>) -> HttpResponse {
    let volumes = &state.volume_service;
    HttpResponse::Ok().json(json!({
        "service": state.config.app.service_name(),
        "hostname": hostname(),
        "mounts": {
            "named_volume": format!("{} → named volume (managed by Docker)", volumes.named_path().display()),
            "bind_mount": format!("{} → host directory (live reload)", volumes.bind_path().display()),
            "tmpfs": format!("{} → in-memory only (lost on container stop)", volumes.tmpfs_path().display()),
        },
        "endpoints": routes::endpoints(state.config.app),
    }))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{config, init_app, state};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use dockyard_services::CacheService;
    use serde_json::Value;
    use std::sync::Arc;

    #[actix_web::test]
    async fn hello_reports_environment() {
        let cfg = config(&[("DEMO_APP", "hello"), ("APP_ENV", "staging")]);
        let app = init_app!(state(cfg, None, Arc::new(CacheService::in_memory())));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Hello from Docker!");
        assert_eq!(body["environment"], "staging");
        assert_eq!(body["platform"], std::env::consts::OS);
    }

    #[actix_web::test]
    async fn hostname_comes_from_the_os() {
        let expected = hostname::get().unwrap().to_string_lossy().to_string();
        let cfg = config(&[("DEMO_APP", "multi-service"), ("DATABASE_URL", "postgres://db/app")]);
        let app = init_app!(state(cfg, None, Arc::new(CacheService::in_memory())));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["hostname"], expected.as_str());
        assert_ne!(body["hostname"], "unknown");
    }

    #[actix_web::test]
    async fn netdemo_lists_its_endpoints() {
        let cfg = config(&[("DEMO_APP", "netdemo")]);
        let app = init_app!(state(cfg, None, Arc::new(CacheService::in_memory())));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["service"], "netdemo-api");
        assert_eq!(
            body["endpoints"],
            serde_json::json!(["/health", "/", "/db", "/cache", "/network-info"])
        );
        assert_eq!(body["container"]["pid"], std::process::id());
    }

    #[actix_web::test]
    async fn volumes_info_uses_configured_paths() {
        let cfg = config(&[("DEMO_APP", "volumes"), ("NAMED_VOLUME_PATH", "/srv/data")]);
        let app = init_app!(state(cfg, None, Arc::new(CacheService::in_memory())));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert!(body["mounts"]["named_volume"].as_str().unwrap().starts_with("/srv/data"));
    }
}
