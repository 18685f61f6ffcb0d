use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One weekly meeting of a subject. `weekday` counts from Monday = 0.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimetableSlot {
    pub id: String,
    pub subject_id: String,
    pub weekday: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
}
