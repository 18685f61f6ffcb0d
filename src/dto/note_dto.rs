use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::trim_optional_string;
use crate::models::note::{Note, NoteLink};
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateNotePayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateNotePayload {
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LinkNotePayload {
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub hackathon_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NoteListQuery {
    pub project_id: Option<String>,
    pub hackathon_id: Option<String>,
    pub pinned: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteDetailResponse {
    #[serde(flatten)]
    pub note: Note,
    pub links: Vec<NoteLink>,
}
