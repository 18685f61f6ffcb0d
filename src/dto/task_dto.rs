use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::trim_optional_string;
use crate::models::priority::Priority;
use crate::models::task::TaskStatus;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTaskPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub hackathon_id: Option<String>,
}

/// Setting either context replaces the task's current one; `detach` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub hackathon_id: Option<String>,
    #[serde(default)]
    pub detach: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskStatusPayload {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub project_id: Option<String>,
    pub hackathon_id: Option<String>,
}
