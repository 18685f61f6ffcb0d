use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::priority::Priority;

text_enum! {
    ProjectStatus {
        Idea => "idea",
        Planning => "planning",
        Active => "active",
        Paused => "paused",
        Completed => "completed",
        Archived => "archived",
    }
}

impl ProjectStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Archived)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: Option<Priority>,
    pub deadline: Option<NaiveDate>,
    pub repo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
