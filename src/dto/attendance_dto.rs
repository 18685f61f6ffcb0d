use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::class_instance::AttendanceStatus;
use crate::models::subject::{Subject, SubjectType};
use crate::services::attendance_risk::SubjectAttendanceStats;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSlotPayload {
    #[validate(length(min = 1))]
    pub subject_id: String,
    /// Monday = 0.
    #[validate(range(min = 0, max = 6))]
    pub weekday: i64,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "09:00:00")]
    pub end_time: NaiveTime,
    #[validate(length(max = 64))]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateInstancesPayload {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateInstancesResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub created: u64,
    pub already_present: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateClassInstancePayload {
    #[validate(length(min = 1))]
    pub subject_id: String,
    pub class_date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "09:00:00")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MarkAttendancePayload {
    pub status: AttendanceStatus,
    #[validate(length(min = 1, max = 64))]
    pub reason_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassInstanceQuery {
    pub subject_id: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectAttendanceResponse {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub subject_type: SubjectType,
    #[serde(flatten)]
    pub stats: SubjectAttendanceStats,
}

impl SubjectAttendanceResponse {
    pub fn new(subject: Subject, stats: SubjectAttendanceStats) -> Self {
        Self {
            subject_id: subject.id,
            subject_name: subject.name,
            subject_code: subject.code,
            subject_type: subject.subject_type,
            stats,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceOverviewResponse {
    pub threshold: i64,
    pub overall: SubjectAttendanceStats,
    pub at_risk: usize,
    pub subjects: Vec<SubjectAttendanceResponse>,
}
