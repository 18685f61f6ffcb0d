use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::note_dto::CreateNotePayload;
use super::{double_option, trim_optional_string};
use crate::models::note::{Note, NoteLink};
use crate::models::priority::Priority;
use crate::models::project::{Project, ProjectStatus};
use crate::models::task::{Task, TaskStatus};
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProjectPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(url)]
    pub repo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProjectPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(url)]
    pub repo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectStatusPayload {
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
}

/// A task staged alongside a project save; it always lands in that project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StagedTaskPayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub hackathon_id: Option<String>,
}

/// Everything the project editor collects, committed in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProjectBatchPayload {
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub project_id: Option<String>,
    #[validate(nested)]
    pub project: UpdateProjectPayload,
    #[serde(default)]
    #[validate(nested)]
    pub tasks: Vec<StagedTaskPayload>,
    #[serde(default)]
    pub link_note_ids: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub new_notes: Vec<CreateNotePayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectBatchResponse {
    pub project: Project,
    pub created: bool,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub links: Vec<NoteLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
}
