use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::trim_optional_string;
use crate::models::faculty::Faculty;
use crate::models::subject::{Subject, SubjectType};
use crate::models::timetable::TimetableSlot;
use crate::services::attendance_risk::SubjectAttendanceStats;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFacultyPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateFacultyPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 120))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 120))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 32))]
    pub code: String,
    pub subject_type: Option<SubjectType>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub faculty_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSubjectPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 120))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 32))]
    pub code: Option<String>,
    pub subject_type: Option<SubjectType>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub faculty_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectDetailResponse {
    #[serde(flatten)]
    pub subject: Subject,
    pub faculty: Option<Faculty>,
    pub timetable: Vec<TimetableSlot>,
    pub attendance: SubjectAttendanceStats,
}
