use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::hackathon_dto::{
        CreateHackathonPayload, HackathonListQuery, HackathonResponse, HackathonStatusPayload,
        UpdateHackathonPayload,
    },
    error::Result,
    models::audit_event::AuditEntity,
    utils::time::today,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/hackathons",
    params(("status" = Option<String>, Query, description = "Status filter")),
    responses((status = 200, description = "Hackathons with missed-deadline advisories"))
)]
#[axum::debug_handler]
pub async fn list_hackathons(
    State(state): State<AppState>,
    Query(query): Query<HackathonListQuery>,
) -> Result<impl IntoResponse> {
    let today = today();
    let hackathons = state.hackathon_service.list(query).await?;
    let items: Vec<HackathonResponse> = hackathons
        .into_iter()
        .map(|hackathon| HackathonResponse::new(hackathon, today))
        .collect();
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/hackathons",
    request_body = CreateHackathonPayload,
    responses(
        (status = 201, description = "Hackathon created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_hackathon(
    State(state): State<AppState>,
    Json(payload): Json<CreateHackathonPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let hackathon = state.hackathon_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(HackathonResponse::new(hackathon, today())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{id}",
    params(("id" = String, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Hackathon"),
        (status = 404, description = "Hackathon not found")
    )
)]
#[axum::debug_handler]
pub async fn get_hackathon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let hackathon = state.hackathon_service.get_by_id(&id).await?;
    Ok(Json(HackathonResponse::new(hackathon, today())))
}

#[utoipa::path(
    patch,
    path = "/api/hackathons/{id}",
    params(("id" = String, Path, description = "Hackathon ID")),
    request_body = UpdateHackathonPayload,
    responses(
        (status = 200, description = "Hackathon updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Hackathon not found")
    )
)]
#[axum::debug_handler]
pub async fn update_hackathon(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateHackathonPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let hackathon = state.hackathon_service.update(&id, payload).await?;
    Ok(Json(HackathonResponse::new(hackathon, today())))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{id}/status",
    params(("id" = String, Path, description = "Hackathon ID")),
    request_body = HackathonStatusPayload,
    responses(
        (status = 200, description = "Status assigned"),
        (status = 404, description = "Hackathon not found")
    )
)]
#[axum::debug_handler]
pub async fn set_hackathon_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<HackathonStatusPayload>,
) -> Result<impl IntoResponse> {
    let hackathon = state
        .hackathon_service
        .set_status(&id, payload.status)
        .await?;
    Ok(Json(HackathonResponse::new(hackathon, today())))
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{id}/history",
    params(("id" = String, Path, description = "Hackathon ID")),
    responses((status = 200, description = "Audit events, oldest first"))
)]
#[axum::debug_handler]
pub async fn hackathon_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let events = state
        .audit_service
        .history(AuditEntity::Hackathon, &id)
        .await?;
    Ok(Json(events))
}

#[utoipa::path(
    delete,
    path = "/api/hackathons/{id}",
    params(("id" = String, Path, description = "Hackathon ID")),
    responses(
        (status = 204, description = "Hackathon deleted; its deadline entries go with it"),
        (status = 404, description = "Hackathon not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_hackathon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.hackathon_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
