use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::calendar_dto::{
        CalendarMonthQuery, CreateCalendarEventPayload, UpcomingQuery,
        UpdateCalendarEventPayload,
    },
    error::Result,
    utils::time::{current_month, today},
    AppState,
};

/// Month view merging manual events with hackathon and project deadlines.
/// Defaults to the current month.
#[utoipa::path(
    get,
    path = "/api/calendar",
    params(
        ("year" = Option<i32>, Query, description = "Calendar year"),
        ("month" = Option<u32>, Query, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Items in the month with urgency"),
        (status = 400, description = "Invalid month")
    )
)]
#[axum::debug_handler]
pub async fn month_view(
    State(state): State<AppState>,
    Query(query): Query<CalendarMonthQuery>,
) -> Result<impl IntoResponse> {
    let (current_year, current) = current_month();
    let view = state
        .calendar_service
        .month(
            query.year.unwrap_or(current_year),
            query.month.unwrap_or(current),
            today(),
        )
        .await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/calendar/upcoming",
    params(("limit" = Option<usize>, Query, description = "Maximum number of items")),
    responses((status = 200, description = "Next open deadlines from today"))
)]
#[axum::debug_handler]
pub async fn upcoming(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<impl IntoResponse> {
    let view = state.calendar_service.upcoming(query.limit, today()).await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/calendar/events",
    responses((status = 200, description = "Manual calendar events"))
)]
#[axum::debug_handler]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let events = state.calendar_service.list_events().await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/calendar/events",
    request_body = CreateCalendarEventPayload,
    responses(
        (status = 201, description = "Event created"),
        (status = 404, description = "Referenced hackathon or project not found")
    )
)]
#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateCalendarEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state.calendar_service.create_event(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/calendar/events/{id}",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Calendar event"),
        (status = 404, description = "Event not found")
    )
)]
#[axum::debug_handler]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let event = state.calendar_service.get_event(&id).await?;
    Ok(Json(event))
}

#[utoipa::path(
    patch,
    path = "/api/calendar/events/{id}",
    params(("id" = String, Path, description = "Calendar event ID")),
    request_body = UpdateCalendarEventPayload,
    responses(
        (status = 200, description = "Event updated"),
        (status = 404, description = "Event not found"),
        (status = 422, description = "Id belongs to a derived deadline")
    )
)]
#[axum::debug_handler]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCalendarEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state.calendar_service.update_event(&id, payload).await?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/api/calendar/events/{id}",
    params(("id" = String, Path, description = "Calendar event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found"),
        (status = 422, description = "Derived deadlines are removed through their source")
    )
)]
#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.calendar_service.delete_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
