use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Rows from the previous tracker. Field names and value spellings vary, so
/// each record is read field by field.
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[serde(default)]
pub struct LegacyImportPayload {
    #[schema(value_type = Vec<Object>)]
    pub projects: Vec<JsonValue>,
    #[schema(value_type = Vec<Object>)]
    pub hackathons: Vec<JsonValue>,
    #[schema(value_type = Vec<Object>)]
    pub tasks: Vec<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportIssue {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntityImportReport {
    pub inserted: u64,
    pub skipped_existing: u64,
    pub skipped_orphaned: u64,
    pub rejected: Vec<ImportIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportReport {
    pub projects: EntityImportReport,
    pub hackathons: EntityImportReport,
    pub tasks: EntityImportReport,
}
