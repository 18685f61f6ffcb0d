use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{double_option, trim_optional_string};
use crate::models::hackathon::{Hackathon, HackathonStatus};
use crate::models::priority::Priority;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateHackathonPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub name: String,
    pub organizer: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(url)]
    pub website: Option<String>,
    pub status: Option<HackathonStatus>,
    pub priority: Option<Priority>,
    pub registration_deadline: Option<NaiveDate>,
    pub submission_deadline: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateHackathonPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub name: Option<String>,
    pub organizer: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(url)]
    pub website: Option<String>,
    pub priority: Option<Priority>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub registration_deadline: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub submission_deadline: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HackathonStatusPayload {
    pub status: HackathonStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HackathonListQuery {
    pub status: Option<HackathonStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HackathonResponse {
    #[serde(flatten)]
    pub hackathon: Hackathon,
    /// Set when the submission deadline passed without a submission.
    /// Never applied to the stored status.
    pub suggested_status: Option<HackathonStatus>,
}

impl HackathonResponse {
    pub fn new(hackathon: Hackathon, today: NaiveDate) -> Self {
        let suggested_status = hackathon
            .appears_missed(today)
            .then_some(HackathonStatus::Missed);
        Self {
            hackathon,
            suggested_status,
        }
    }
}
