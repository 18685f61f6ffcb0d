use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        project_dto::{
            CreateProjectPayload, ProjectBatchPayload, ProjectDetailResponse, ProjectListQuery,
            ProjectStatusPayload, UpdateProjectPayload,
        },
        task_dto::TaskListQuery,
    },
    error::Result,
    models::audit_event::AuditEntity,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/projects",
    params(("status" = Option<String>, Query, description = "Status filter")),
    responses((status = 200, description = "Projects ordered by deadline"))
)]
#[axum::debug_handler]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<impl IntoResponse> {
    let projects = state.project_service.list(query).await?;
    Ok(Json(projects))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectPayload,
    responses(
        (status = 201, description = "Project created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let project = state.project_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project with its tasks and linked notes"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let project = state.project_service.get_by_id(&id).await?;
    let tasks = state
        .task_service
        .list(TaskListQuery {
            project_id: Some(id.clone()),
            ..TaskListQuery::default()
        })
        .await?;
    let notes = state.note_service.notes_for_project(&id).await?;
    Ok(Json(ProjectDetailResponse {
        project,
        tasks,
        notes,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    request_body = UpdateProjectPayload,
    responses(
        (status = 200, description = "Project updated"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProjectPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let project = state.project_service.update(&id, payload).await?;
    Ok(Json(project))
}

#[utoipa::path(
    post,
    path = "/api/projects/{id}/status",
    params(("id" = String, Path, description = "Project ID")),
    request_body = ProjectStatusPayload,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn set_project_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProjectStatusPayload>,
) -> Result<impl IntoResponse> {
    let project = state.project_service.set_status(&id, payload.status).await?;
    Ok(Json(project))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}/history",
    params(("id" = String, Path, description = "Project ID")),
    responses((status = 200, description = "Audit events, oldest first"))
)]
#[axum::debug_handler]
pub async fn project_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let events = state.audit_service.history(AuditEntity::Project, &id).await?;
    Ok(Json(events))
}

/// One request for everything the project editor staged. Nothing is written
/// unless every part succeeds.
#[utoipa::path(
    post,
    path = "/api/projects/save",
    request_body = ProjectBatchPayload,
    responses(
        (status = 201, description = "Project created with its staged items"),
        (status = 200, description = "Project updated with its staged items"),
        (status = 404, description = "Project, note or hackathon not found"),
        (status = 422, description = "A staged task names a hackathon")
    )
)]
#[axum::debug_handler]
pub async fn save_project_batch(
    State(state): State<AppState>,
    Json(payload): Json<ProjectBatchPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let saved = state.project_service.save_batch(payload).await?;
    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(saved)))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted; its deadline entry goes with it"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.project_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
