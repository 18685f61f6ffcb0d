use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::trim_optional_string;
use crate::models::calendar_event::EventType;
use crate::models::priority::Priority;
use crate::services::calendar_aggregator::AnnotatedItem;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCalendarEventPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub event_time: Option<NaiveTime>,
    pub event_type: Option<EventType>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub hackathon_id: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCalendarEventPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub event_time: Option<NaiveTime>,
    pub event_type: Option<EventType>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalendarMonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpcomingQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarViewResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub today: NaiveDate,
    pub items: Vec<AnnotatedItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingResponse {
    pub today: NaiveDate,
    pub items: Vec<AnnotatedItem>,
}
