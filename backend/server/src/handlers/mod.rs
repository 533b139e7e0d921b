pub mod cache;
pub mod health;
pub mod info;
pub mod network;
pub mod tasks;
pub mod users;
pub mod volumes;

use crate::routes;
use crate::state::AppState;
use actix_web::{HttpResponse, web};
use dockyard_shared::ErrorBody;

/// Fallback for every unmatched path or method.
pub async fn not_found(state: web::Data<AppState>) -> HttpResponse {
    let endpoints = routes::endpoints(state.config.app)
        .iter()
        .map(|e| e.to_string())
        .collect();
    HttpResponse::NotFound().json(ErrorBody {
        error: "Not found".to_string(),
        endpoints: Some(endpoints),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::state::AppState;
    use actix_web::web;
    use dockyard_services::{CacheService, Uptime};
    use sea_orm::DatabaseConnection;
    use std::collections::HashMap;
    use std::sync::Arc;

    pub fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
    }

    pub fn state(config: Config, db: Option<DatabaseConnection>, cache: Arc<CacheService>) -> web::Data<AppState> {
        web::Data::new(AppState::from_parts(config, Uptime::start(), db, cache))
    }

    /// Build the configured app's route table around `state`.
    macro_rules! init_app {
        ($state:expr) => {{
            let state = $state;
            let app = state.config.app;
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(state)
                    .configure(crate::routes::configure(app)),
            )
            .await
        }};
    }

    pub(crate) use init_app;
}
