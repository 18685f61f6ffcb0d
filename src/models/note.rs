use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exactly one of `project_id` / `hackathon_id` is set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NoteLink {
    pub id: String,
    pub note_id: String,
    pub project_id: Option<String>,
    pub hackathon_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
