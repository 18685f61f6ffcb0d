use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::trim_optional_string;
use crate::models::application::{ApplicationKind, ApplicationStage};
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateApplicationPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub company: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub role: String,
    pub kind: Option<ApplicationKind>,
    pub stage: Option<ApplicationStage>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(url)]
    pub url: Option<String>,
    pub applied_on: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicationPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub company: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub role: Option<String>,
    pub kind: Option<ApplicationKind>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(url)]
    pub url: Option<String>,
    pub applied_on: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationStagePayload {
    pub stage: ApplicationStage,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub stage: Option<ApplicationStage>,
    pub kind: Option<ApplicationKind>,
}
