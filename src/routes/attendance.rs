use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    dto::attendance_dto::{
        ClassInstanceQuery, CreateClassInstancePayload, CreateSlotPayload,
        GenerateInstancesPayload, MarkAttendancePayload,
    },
    error::Result,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SlotListQuery {
    pub subject_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/timetable",
    params(("subject_id" = Option<String>, Query, description = "Only this subject's slots")),
    responses((status = 200, description = "Weekly timetable slots"))
)]
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotListQuery>,
) -> Result<impl IntoResponse> {
    let slots = state
        .subject_service
        .list_slots(query.subject_id.as_deref())
        .await?;
    Ok(Json(slots))
}

#[utoipa::path(
    post,
    path = "/api/timetable",
    request_body = CreateSlotPayload,
    responses(
        (status = 201, description = "Slot created"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<AppState>,
    Json(payload): Json<CreateSlotPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let slot = state.subject_service.create_slot(payload).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

#[utoipa::path(
    delete,
    path = "/api/timetable/{id}",
    params(("id" = String, Path, description = "Timetable slot ID")),
    responses(
        (status = 204, description = "Slot deleted"),
        (status = 404, description = "Slot not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.subject_service.delete_slot(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Expands the weekly timetable over a date range. Safe to repeat.
#[utoipa::path(
    post,
    path = "/api/timetable/generate",
    request_body = GenerateInstancesPayload,
    responses(
        (status = 200, description = "Counts of created and already present instances"),
        (status = 400, description = "Invalid range")
    )
)]
#[axum::debug_handler]
pub async fn generate_instances(
    State(state): State<AppState>,
    Json(payload): Json<GenerateInstancesPayload>,
) -> Result<impl IntoResponse> {
    let result = state
        .attendance_service
        .generate(payload.from, payload.to)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/class-instances",
    params(
        ("subject_id" = Option<String>, Query, description = "Subject filter"),
        ("status" = Option<String>, Query, description = "Attendance status filter"),
        ("from" = Option<String>, Query, description = "Earliest class date"),
        ("to" = Option<String>, Query, description = "Latest class date")
    ),
    responses((status = 200, description = "Class instances in date order"))
)]
#[axum::debug_handler]
pub async fn list_instances(
    State(state): State<AppState>,
    Query(query): Query<ClassInstanceQuery>,
) -> Result<impl IntoResponse> {
    let instances = state.attendance_service.list_instances(query).await?;
    Ok(Json(instances))
}

#[utoipa::path(
    post,
    path = "/api/class-instances",
    request_body = CreateClassInstancePayload,
    responses(
        (status = 201, description = "Class instance created"),
        (status = 200, description = "Instance already existed for that subject, date and time"),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn create_instance(
    State(state): State<AppState>,
    Json(payload): Json<CreateClassInstancePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (instance, created) = state.attendance_service.create_instance(payload).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(instance)))
}

#[utoipa::path(
    patch,
    path = "/api/class-instances/{id}/attendance",
    params(("id" = String, Path, description = "Class instance ID")),
    request_body = MarkAttendancePayload,
    responses(
        (status = 200, description = "Attendance recorded"),
        (status = 404, description = "Class instance not found")
    )
)]
#[axum::debug_handler]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MarkAttendancePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let instance = state.attendance_service.mark(&id, payload).await?;
    Ok(Json(instance))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    responses((status = 200, description = "Per-subject attendance, riskiest first"))
)]
#[axum::debug_handler]
pub async fn attendance_overview(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let subjects = state.subject_service.list_subjects().await?;
    let overview = state.attendance_service.overview(subjects).await?;
    Ok(Json(overview))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{subject_id}",
    params(("subject_id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Attendance for one subject"),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn subject_attendance(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> Result<impl IntoResponse> {
    let subject = state.subject_service.get_subject(&subject_id).await?;
    let stats = state.attendance_service.subject_stats(subject).await?;
    Ok(Json(stats))
}
