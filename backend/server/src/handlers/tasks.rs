use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{HttpResponse, web};
use dockyard_shared::{NewTask, TaskPatch};
use serde_json::json;

/// All tasks, from the list cache when it is warm.
pub async fn list_tasks(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let (tasks, source) = state.tasks()?.list().await?;
    Ok(HttpResponse::Ok().json(json!({
        "tasks": tasks,
        "source": source,
    })))
}

pub async fn get_task(state: web::Data<AppState>, path: web::Path<i32>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    match state.tasks()?.get(id).await? {
        Some(task) => Ok(HttpResponse::Ok().json(json!({ "task": task }))),
        None => Err(ApiError::NotFound("Task not found".to_string())),
    }
}

pub async fn create_task(
    state: web::Data<AppState>,
    body: web::Json<NewTask>,
) -> ApiResult<HttpResponse> {
    let task = state.tasks()?.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "task": task })))
}

pub async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<TaskPatch>,
) -> ApiResult<HttpResponse> {
    let task = state
        .tasks()?
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

pub async fn delete_task(state: web::Data<AppState>, path: web::Path<i32>) -> ApiResult<HttpResponse> {
    state.tasks()?.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
