use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEvent {
    pub id: String,
    pub entity_id: String,
    pub action: String,
    pub changes: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEntity {
    Task,
    Project,
    Hackathon,
}

impl AuditEntity {
    pub fn table(&self) -> &'static str {
        match self {
            AuditEntity::Task => "task_events",
            AuditEntity::Project => "project_events",
            AuditEntity::Hackathon => "hackathon_events",
        }
    }
}
