use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::task_dto::{CreateTaskPayload, TaskListQuery, TaskStatusPayload, UpdateTaskPayload},
    error::Result,
    models::audit_event::AuditEntity,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/tasks",
    params(
        ("status" = Option<String>, Query, description = "Status filter"),
        ("project_id" = Option<String>, Query, description = "Project filter"),
        ("hackathon_id" = Option<String>, Query, description = "Hackathon filter")
    ),
    responses((status = 200, description = "Tasks ordered by due date"))
)]
#[axum::debug_handler]
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<impl IntoResponse> {
    let tasks = state.task_service.list(query).await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskPayload,
    responses(
        (status = 201, description = "Task created"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Project or hackathon not found"),
        (status = 422, description = "Task names both a project and a hackathon")
    )
)]
#[axum::debug_handler]
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let task = state.task_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task"),
        (status = 404, description = "Task not found")
    )
)]
#[axum::debug_handler]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let task = state.task_service.get_by_id(&id).await?;
    Ok(Json(task))
}

#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    request_body = UpdateTaskPayload,
    responses(
        (status = 200, description = "Task updated"),
        (status = 404, description = "Task not found"),
        (status = 422, description = "Task would belong to both a project and a hackathon")
    )
)]
#[axum::debug_handler]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let task = state.task_service.update(&id, payload).await?;
    Ok(Json(task))
}

#[utoipa::path(
    post,
    path = "/api/tasks/{id}/status",
    params(("id" = String, Path, description = "Task ID")),
    request_body = TaskStatusPayload,
    responses(
        (status = 200, description = "Status assigned"),
        (status = 404, description = "Task not found")
    )
)]
#[axum::debug_handler]
pub async fn set_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskStatusPayload>,
) -> Result<impl IntoResponse> {
    let task = state.task_service.set_status(&id, payload.status).await?;
    Ok(Json(task))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}/history",
    params(("id" = String, Path, description = "Task ID")),
    responses((status = 200, description = "Audit events, oldest first"))
)]
#[axum::debug_handler]
pub async fn task_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let events = state.audit_service.history(AuditEntity::Task, &id).await?;
    Ok(Json(events))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.task_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
