use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{error::Result, utils::time::today, AppState};

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, description = "Attendance, deadlines, task and application summary"))
)]
#[axum::debug_handler]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let summary = state.dashboard_service.summary(today()).await?;
    Ok(Json(summary))
}
