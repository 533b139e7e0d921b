use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{HttpResponse, web};
use dockyard_services::StoreError;
use dockyard_shared::NewUser;
use serde_json::json;

/// Newest 50 users.
pub async fn list_users(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let users = state.users()?.list().await.map_err(|e| match e {
        StoreError::Database(e) => ApiError::internal("Database query failed", e),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "count": users.len(),
        "users": users,
    })))
}

pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<NewUser>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users()?
        .create(body.into_inner())
        .await
        .map_err(|e| match e {
            StoreError::Database(e) => ApiError::internal("Database insert failed", e),
            other => other.into(),
        })?;

    Ok(HttpResponse::Created().json(json!({ "user": user })))
}
