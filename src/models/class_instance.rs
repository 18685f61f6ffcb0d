use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

text_enum! {
    AttendanceStatus {
        Unmarked => "unmarked",
        Present => "present",
        Absent => "absent",
        Excused => "excused",
        Cancelled => "cancelled",
        NoClass => "no_class",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClassInstance {
    pub id: String,
    pub subject_id: String,
    pub slot_id: Option<String>,
    pub class_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AttendanceStatus,
    pub reason_code: Option<String>,
    pub marked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
