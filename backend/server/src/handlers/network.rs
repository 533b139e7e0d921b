use crate::state::AppState;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use dockyard_services::probe;
use dockyard_shared::ProbeResult;

const NETWORK_NOTE: &str =
    "All names resolve because this container is on both frontend and backend networks.";

fn probe_response(result: ProbeResult) -> HttpResponse {
    let status = if result.reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    HttpResponse::build(status).json(result)
}

/// TCP reachability of Postgres across the backend network.
pub async fn probe_database(state: web::Data<AppState>) -> HttpResponse {
    let cfg = &state.config;
    probe_response(probe::probe_tcp(&cfg.db_host, cfg.db_port, cfg.probe_timeout).await)
}

/// TCP reachability of Redis plus its reply to an inline `PING`.
pub async fn probe_cache(state: web::Data<AppState>) -> HttpResponse {
    let cfg = &state.config;
    probe_response(probe::probe_redis_ping(&cfg.redis_host, cfg.redis_port, cfg.probe_timeout).await)
}

pub async fn network_info(state: web::Data<AppState>) -> HttpResponse {
    let cfg = &state.config;
    let info = probe::network_info(&cfg.network_info_hosts, cfg.dns_timeout, NETWORK_NOTE).await;
    HttpResponse::Ok().json(info)
}
