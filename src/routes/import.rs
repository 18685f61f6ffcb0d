use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{dto::import_dto::LegacyImportPayload, error::Result, AppState};

#[utoipa::path(
    post,
    path = "/api/import/legacy",
    request_body = LegacyImportPayload,
    responses(
        (status = 200, description = "Per-entity counts of inserted, skipped and rejected records"),
        (status = 400, description = "Payload too large or malformed")
    )
)]
#[axum::debug_handler]
pub async fn import_legacy(
    State(state): State<AppState>,
    Json(payload): Json<LegacyImportPayload>,
) -> Result<impl IntoResponse> {
    let report = state.import_service.import_legacy(payload).await?;
    Ok(Json(report))
}
