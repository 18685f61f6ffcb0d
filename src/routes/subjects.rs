use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::subject_dto::{
        CreateFacultyPayload, CreateSubjectPayload, SubjectDetailResponse, UpdateFacultyPayload,
        UpdateSubjectPayload,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/faculty",
    responses((status = 200, description = "All faculty members"))
)]
#[axum::debug_handler]
pub async fn list_faculty(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let faculty = state.subject_service.list_faculty().await?;
    Ok(Json(faculty))
}

#[utoipa::path(
    post,
    path = "/api/faculty",
    request_body = CreateFacultyPayload,
    responses(
        (status = 201, description = "Faculty member created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_faculty(
    State(state): State<AppState>,
    Json(payload): Json<CreateFacultyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let faculty = state.subject_service.create_faculty(payload).await?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

#[utoipa::path(
    get,
    path = "/api/faculty/{id}",
    params(("id" = String, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty member"),
        (status = 404, description = "Faculty member not found")
    )
)]
#[axum::debug_handler]
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let faculty = state.subject_service.get_faculty(&id).await?;
    Ok(Json(faculty))
}

#[utoipa::path(
    patch,
    path = "/api/faculty/{id}",
    params(("id" = String, Path, description = "Faculty ID")),
    request_body = UpdateFacultyPayload,
    responses(
        (status = 200, description = "Faculty member updated"),
        (status = 404, description = "Faculty member not found")
    )
)]
#[axum::debug_handler]
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFacultyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let faculty = state.subject_service.update_faculty(&id, payload).await?;
    Ok(Json(faculty))
}

#[utoipa::path(
    delete,
    path = "/api/faculty/{id}",
    params(("id" = String, Path, description = "Faculty ID")),
    responses(
        (status = 204, description = "Faculty member deleted"),
        (status = 404, description = "Faculty member not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.subject_service.delete_faculty(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/subjects",
    responses((status = 200, description = "All subjects ordered by code"))
)]
#[axum::debug_handler]
pub async fn list_subjects(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let subjects = state.subject_service.list_subjects().await?;
    Ok(Json(subjects))
}

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectPayload,
    responses(
        (status = 201, description = "Subject created"),
        (status = 400, description = "Invalid payload or duplicate code")
    )
)]
#[axum::debug_handler]
pub async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubjectPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let subject = state.subject_service.create_subject(payload).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// Subject with its faculty member, weekly slots and live attendance figures.
#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject detail"),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let subject = state.subject_service.get_subject(&id).await?;
    let faculty = match subject.faculty_id.as_deref() {
        Some(faculty_id) => Some(state.subject_service.get_faculty(faculty_id).await?),
        None => None,
    };
    let timetable = state.subject_service.list_slots(Some(&id)).await?;
    let attendance = state
        .attendance_service
        .subject_stats(subject.clone())
        .await?
        .stats;

    Ok(Json(SubjectDetailResponse {
        subject,
        faculty,
        timetable,
        attendance,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/subjects/{id}",
    params(("id" = String, Path, description = "Subject ID")),
    request_body = UpdateSubjectPayload,
    responses(
        (status = 200, description = "Subject updated"),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSubjectPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let subject = state.subject_service.update_subject(&id, payload).await?;
    Ok(Json(subject))
}

#[utoipa::path(
    delete,
    path = "/api/subjects/{id}",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 204, description = "Subject deleted"),
        (status = 404, description = "Subject not found"),
        (status = 422, description = "Subject still has class instances")
    )
)]
#[axum::debug_handler]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.subject_service.delete_subject(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
