use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio_util::io::ReaderStream;

use crate::{error::Result, services::export_service::ExportService, AppState};

/// Full JSON dump of every table.
#[utoipa::path(
    get,
    path = "/api/export",
    responses((status = 200, description = "JSON dump of every table"))
)]
pub async fn export_json(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let dump = state.export_service.dump().await?;
    let disposition = format!(
        "attachment; filename=\"console_export_{}.json\"",
        chrono::Utc::now().format("%Y%m%d_%H%M")
    );
    Ok((
        StatusCode::OK,
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(dump),
    ))
}

/// Raw SQLite copy, streamed from a consistent snapshot.
#[utoipa::path(
    get,
    path = "/api/export/database",
    responses((status = 200, description = "SQLite database file", content_type = "application/vnd.sqlite3"))
)]
pub async fn export_database(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let file = state.export_service.snapshot_database().await?;
    let body = Body::from_stream(ReaderStream::new(file));
    let disposition = format!(
        "attachment; filename=\"console_{}.db\"",
        chrono::Utc::now().format("%Y%m%d_%H%M")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/vnd.sqlite3".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// Attendance report as XLSX
#[utoipa::path(
    get,
    path = "/api/export/attendance",
    responses((status = 200, description = "Attendance workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"))
)]
pub async fn export_attendance(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let subjects = state.subject_service.list_subjects().await?;
    let overview = state.attendance_service.overview(subjects).await?;
    let buffer = ExportService::attendance_xlsx(&overview)?;
    let disposition = format!(
        "attachment; filename=\"attendance_{}.xlsx\"",
        chrono::Utc::now().format("%Y%m%d")
    );

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
