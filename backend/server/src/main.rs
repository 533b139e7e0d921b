mod config;
mod error;
mod handlers;
mod routes;
mod state;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::Config;
use dockyard_services::Uptime;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let uptime = Uptime::start();
    dotenv::dotenv().ok();
    let default_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_level));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("[FATAL] {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config, uptime).await {
        log::error!("[FATAL] Failed to start: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(config: Config, uptime: Uptime) -> anyhow::Result<()> {
    let app = config.app;
    let service = app.service_name();
    let bind_addr = (config.server_host.clone(), config.server_port);
    let shutdown_timeout = config.shutdown_timeout.as_secs();

    log::info!(
        "[{}] Starting DEMO_APP={} on {}:{} ({})",
        service,
        app,
        bind_addr.0,
        bind_addr.1,
        config.environment.as_deref().unwrap_or("unset")
    );
    if app == config::DemoApp::NetDemo {
        log::info!("[{}] DB_HOST={} | REDIS_HOST={}", service, config.db_host, config.redis_host);
    }

    let app_state = web::Data::new(AppState::initialize(config, uptime).await?);
    let db = app_state.db.clone();

    // Stops accepting on SIGTERM/SIGINT and drains in-flight requests for up to
    // `shutdown_timeout` seconds before workers are dropped.
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_method()
            .allow_any_origin()
            .allow_any_header();

        App::new()
            .wrap(Logger::new("%r %s %Dms"))
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(routes::configure(app))
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(bind_addr)?
    .run()
    .await?;

    log::info!("[{}] Shutting down gracefully", service);
    if let Some(db) = db {
        if let Err(e) = db.close().await {
            log::warn!("[DB] Pool did not close cleanly: {}", e);
        }
    }
    log::info!("[{}] Shutdown complete", service);

    Ok(())
}
