use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationStagePayload, CreateApplicationPayload,
        UpdateApplicationPayload,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("stage" = Option<String>, Query, description = "Stage filter"),
        ("kind" = Option<String>, Query, description = "Kind filter")
    ),
    responses((status = 200, description = "Applications ordered by deadline"))
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list(query).await?;
    Ok(Json(applications))
}

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get_by_id(&id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application ID")),
    request_body = UpdateApplicationPayload,
    responses(
        (status = 200, description = "Application updated"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.update(&id, payload).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/stage",
    params(("id" = String, Path, description = "Application ID")),
    request_body = ApplicationStagePayload,
    responses(
        (status = 200, description = "Stage assigned"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn set_application_stage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ApplicationStagePayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .set_stage(&id, payload.stage)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(("id" = String, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.application_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
