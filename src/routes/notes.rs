use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::note_dto::{CreateNotePayload, LinkNotePayload, NoteListQuery, UpdateNotePayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notes",
    params(
        ("project_id" = Option<String>, Query, description = "Notes linked to this project"),
        ("hackathon_id" = Option<String>, Query, description = "Notes linked to this hackathon"),
        ("pinned" = Option<bool>, Query, description = "Pinned filter")
    ),
    responses((status = 200, description = "Pinned notes first, then most recent"))
)]
#[axum::debug_handler]
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<NoteListQuery>,
) -> Result<impl IntoResponse> {
    let notes = state.note_service.list(query).await?;
    Ok(Json(notes))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = CreateNotePayload,
    responses(
        (status = 201, description = "Note created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_note(
    State(state): State<AppState>,
    Json(payload): Json<CreateNotePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let note = state.note_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(("id" = String, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note with its links"),
        (status = 404, description = "Note not found")
    )
)]
#[axum::debug_handler]
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let detail = state.note_service.detail(&id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    patch,
    path = "/api/notes/{id}",
    params(("id" = String, Path, description = "Note ID")),
    request_body = UpdateNotePayload,
    responses(
        (status = 200, description = "Note updated"),
        (status = 404, description = "Note not found")
    )
)]
#[axum::debug_handler]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateNotePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let note = state.note_service.update(&id, payload).await?;
    Ok(Json(note))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(("id" = String, Path, description = "Note ID")),
    responses(
        (status = 204, description = "Note and its links deleted"),
        (status = 404, description = "Note not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.note_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/notes/{id}/links",
    params(("id" = String, Path, description = "Note ID")),
    request_body = LinkNotePayload,
    responses(
        (status = 201, description = "Note linked"),
        (status = 404, description = "Note or target not found"),
        (status = 422, description = "Both a project and a hackathon were named")
    )
)]
#[axum::debug_handler]
pub async fn link_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<LinkNotePayload>,
) -> Result<impl IntoResponse> {
    let link = state.note_service.link(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}/links/{link_id}",
    params(
        ("id" = String, Path, description = "Note ID"),
        ("link_id" = String, Path, description = "Link ID")
    ),
    responses(
        (status = 204, description = "Link removed"),
        (status = 404, description = "Link not found on this note")
    )
)]
#[axum::debug_handler]
pub async fn unlink_note(
    State(state): State<AppState>,
    Path((id, link_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    state.note_service.unlink(&id, &link_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
