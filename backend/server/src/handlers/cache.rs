use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{HttpResponse, web};
use dockyard_shared::{CacheEntry, CacheWrite};

fn cache_failure(e: anyhow::Error) -> ApiError {
    log::error!("[REDIS] Error: {}", e);
    ApiError::Internal(e.to_string())
}

pub async fn get_entry(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let key = path.into_inner();
    let value = state.cache_service.get_raw(&key).await.map_err(cache_failure)?;

    let found = value.is_some();
    let entry = CacheEntry { key, value, ttl: None };
    Ok(if found {
        HttpResponse::Ok().json(entry)
    } else {
        HttpResponse::NotFound().json(entry)
    })
}

/// Store a string value under `key` with the configured TTL.
pub async fn put_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CacheWrite>,
) -> ApiResult<HttpResponse> {
    let key = path.into_inner();
    let value = match body.into_inner().value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(ApiError::BadRequest("value is required".to_string())),
    };

    let ttl = state.config.cache_ttl;
    state
        .cache_service
        .set_raw(&key, &value, Some(ttl))
        .await
        .map_err(cache_failure)?;

    Ok(HttpResponse::Ok().json(CacheEntry {
        key,
        value: Some(value),
        ttl: Some(ttl.as_secs()),
    }))
}
