use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::priority::Priority;

text_enum! {
    EventType {
        Academic => "academic",
        Hackathon => "hackathon",
        Project => "project",
        Personal => "personal",
    }
}

/// A manually created, user-owned calendar row. Deadline entries derived
/// from hackathons and projects are never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<NaiveTime>,
    pub event_type: EventType,
    pub priority: Option<Priority>,
    pub hackathon_id: Option<String>,
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
