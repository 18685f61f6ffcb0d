use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::{json, Map, Value as JsonValue};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::dto::import_dto::{EntityImportReport, ImportIssue, ImportReport, LegacyImportPayload};
use crate::error::{Error, Result};
use crate::models::audit_event::AuditEntity;
use crate::models::hackathon::HackathonStatus;
use crate::models::priority::Priority;
use crate::models::project::ProjectStatus;
use crate::models::task::TaskStatus;
use crate::services::audit_service::AuditService;
use crate::services::task_service::{insert_task, NewTask};
use crate::utils::time::{now, parse_loose_date};

/// Upper bound on records per entity in one import request.
pub const MAX_IMPORT_RECORDS: usize = 5000;

/// Outcome of reading one legacy record.
enum Parsed<T> {
    Ready(T),
    Rejected(String),
}

/// Field access over a loosely shaped legacy object. Keys are tried in order
/// so both snake_case and camelCase exports resolve.
struct LegacyRecord<'a>(&'a Map<String, JsonValue>);

impl<'a> LegacyRecord<'a> {
    fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.0.get(*key) {
            Some(JsonValue::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    fn date(&self, keys: &[&str]) -> std::result::Result<Option<NaiveDate>, String> {
        match self.text(keys) {
            Some(raw) => parse_loose_date(&raw)
                .map(Some)
                .map_err(|_| format!("'{}' is not a date", raw)),
            None => Ok(None),
        }
    }

    fn parsed<T>(&self, keys: &[&str]) -> std::result::Result<Option<T>, String>
    where
        T: FromStr<Err = Error>,
    {
        match self.text(keys) {
            Some(raw) => raw.parse::<T>().map(Some).map_err(|e| e.to_string()),
            None => Ok(None),
        }
    }
}

#[derive(Clone)]
pub struct ImportService {
    pool: SqlitePool,
}

impl ImportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Imports everything in one transaction. Records whose id already
    /// exists are skipped, so re-running the same payload changes nothing.
    /// Per-record problems land in the report; only storage failures abort.
    pub async fn import_legacy(&self, payload: LegacyImportPayload) -> Result<ImportReport> {
        for (label, len) in [
            ("projects", payload.projects.len()),
            ("hackathons", payload.hackathons.len()),
            ("tasks", payload.tasks.len()),
        ] {
            if len > MAX_IMPORT_RECORDS {
                return Err(Error::BadRequest(format!(
                    "At most {} {} can be imported at once (got {})",
                    MAX_IMPORT_RECORDS, label, len
                )));
            }
        }

        let mut tx = self.pool.begin().await?;
        let mut report = ImportReport::default();

        for (index, value) in payload.projects.iter().enumerate() {
            import_project(&mut tx, index, value, &mut report.projects).await?;
        }
        for (index, value) in payload.hackathons.iter().enumerate() {
            import_hackathon(&mut tx, index, value, &mut report.hackathons).await?;
        }

        let project_ids = existing_ids(&mut tx, "projects").await?;
        let hackathon_ids = existing_ids(&mut tx, "hackathons").await?;
        for (index, value) in payload.tasks.iter().enumerate() {
            import_task(
                &mut tx,
                index,
                value,
                &project_ids,
                &hackathon_ids,
                &mut report.tasks,
            )
            .await?;
        }

        tx.commit().await?;

        info!(
            projects = report.projects.inserted,
            hackathons = report.hackathons.inserted,
            tasks = report.tasks.inserted,
            "Legacy import finished"
        );
        Ok(report)
    }
}

fn reject(report: &mut EntityImportReport, index: usize, id: Option<String>, reason: String) {
    warn!(index, id = ?id, %reason, "Legacy record rejected");
    report.rejected.push(ImportIssue { index, id, reason });
}

/// Resolves the record object and its id, or files the rejection.
fn open<'a>(
    index: usize,
    value: &'a JsonValue,
    report: &mut EntityImportReport,
) -> Option<(LegacyRecord<'a>, String)> {
    let Some(map) = value.as_object() else {
        reject(report, index, None, "record is not an object".to_string());
        return None;
    };
    let record = LegacyRecord(map);
    match record.text(&["id", "_id"]) {
        Some(id) => Some((record, id)),
        None => {
            reject(report, index, None, "record has no id".to_string());
            None
        }
    }
}

async fn id_exists(conn: &mut SqliteConnection, table: &str, id: &str) -> Result<bool> {
    let sql = format!("SELECT id FROM {} WHERE id = ?", table);
    let found: Option<String> = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

async fn existing_ids(conn: &mut SqliteConnection, table: &str) -> Result<HashSet<String>> {
    let sql = format!("SELECT id FROM {}", table);
    let ids: Vec<String> = sqlx::query_scalar(&sql).fetch_all(conn).await?;
    Ok(ids.into_iter().collect())
}

struct LegacyProject {
    name: String,
    description: Option<String>,
    status: ProjectStatus,
    priority: Option<Priority>,
    deadline: Option<NaiveDate>,
    repo_url: Option<String>,
}

fn read_project(record: &LegacyRecord<'_>) -> std::result::Result<Parsed<LegacyProject>, String> {
    let Some(name) = record.text(&["name", "title"]) else {
        return Ok(Parsed::Rejected("project has no name".to_string()));
    };
    Ok(Parsed::Ready(LegacyProject {
        name,
        description: record.text(&["description"]),
        status: record
            .parsed(&["status"])?
            .unwrap_or(ProjectStatus::Idea),
        priority: record.parsed(&["priority"])?,
        deadline: record.date(&["deadline", "dueDate", "due_date"])?,
        repo_url: record.text(&["repo_url", "repoUrl", "github"]),
    }))
}

async fn import_project(
    conn: &mut SqliteConnection,
    index: usize,
    value: &JsonValue,
    report: &mut EntityImportReport,
) -> Result<()> {
    let Some((record, id)) = open(index, value, report) else {
        return Ok(());
    };
    if id_exists(&mut *conn, "projects", &id).await? {
        report.skipped_existing += 1;
        return Ok(());
    }
    let project = match read_project(&record) {
        Ok(Parsed::Ready(project)) => project,
        Ok(Parsed::Rejected(reason)) | Err(reason) => {
            reject(report, index, Some(id), reason);
            return Ok(());
        }
    };

    let timestamp = now();
    sqlx::query(
        r#"
        INSERT INTO projects (id, name, description, status, priority, deadline, repo_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&project.name)
    .bind(project.description)
    .bind(project.status)
    .bind(project.priority)
    .bind(project.deadline)
    .bind(project.repo_url)
    .bind(timestamp)
    .bind(timestamp)
    .execute(&mut *conn)
    .await?;

    AuditService::record(
        conn,
        AuditEntity::Project,
        &id,
        "imported",
        Some(json!({ "name": project.name, "status": project.status })),
    )
    .await?;
    report.inserted += 1;
    Ok(())
}

struct LegacyHackathon {
    name: String,
    organizer: Option<String>,
    website: Option<String>,
    status: HackathonStatus,
    priority: Option<Priority>,
    registration_deadline: Option<NaiveDate>,
    submission_deadline: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    notes: Option<String>,
}

fn read_hackathon(
    record: &LegacyRecord<'_>,
) -> std::result::Result<Parsed<LegacyHackathon>, String> {
    let Some(name) = record.text(&["name", "title"]) else {
        return Ok(Parsed::Rejected("hackathon has no name".to_string()));
    };
    let hackathon = LegacyHackathon {
        name,
        organizer: record.text(&["organizer"]),
        website: record.text(&["website", "url"]),
        status: record
            .parsed(&["status"])?
            .unwrap_or(HackathonStatus::Discovered),
        priority: record.parsed(&["priority"])?,
        registration_deadline: record
            .date(&["registration_deadline", "registrationDeadline"])?,
        submission_deadline: record.date(&["submission_deadline", "submissionDeadline"])?,
        start_date: record.date(&["start_date", "startDate"])?,
        end_date: record.date(&["end_date", "endDate"])?,
        notes: record.text(&["notes"]),
    };
    if let (Some(start), Some(end)) = (hackathon.start_date, hackathon.end_date) {
        if start > end {
            return Ok(Parsed::Rejected(format!(
                "starts on {} but ends on {}",
                start, end
            )));
        }
    }
    Ok(Parsed::Ready(hackathon))
}

async fn import_hackathon(
    conn: &mut SqliteConnection,
    index: usize,
    value: &JsonValue,
    report: &mut EntityImportReport,
) -> Result<()> {
    let Some((record, id)) = open(index, value, report) else {
        return Ok(());
    };
    if id_exists(&mut *conn, "hackathons", &id).await? {
        report.skipped_existing += 1;
        return Ok(());
    }
    let hackathon = match read_hackathon(&record) {
        Ok(Parsed::Ready(hackathon)) => hackathon,
        Ok(Parsed::Rejected(reason)) | Err(reason) => {
            reject(report, index, Some(id), reason);
            return Ok(());
        }
    };

    let timestamp = now();
    sqlx::query(
        r#"
        INSERT INTO hackathons (
            id, name, organizer, website, status, priority, registration_deadline,
            submission_deadline, start_date, end_date, notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&hackathon.name)
    .bind(hackathon.organizer)
    .bind(hackathon.website)
    .bind(hackathon.status)
    .bind(hackathon.priority)
    .bind(hackathon.registration_deadline)
    .bind(hackathon.submission_deadline)
    .bind(hackathon.start_date)
    .bind(hackathon.end_date)
    .bind(hackathon.notes)
    .bind(timestamp)
    .bind(timestamp)
    .execute(&mut *conn)
    .await?;

    AuditService::record(
        conn,
        AuditEntity::Hackathon,
        &id,
        "imported",
        Some(json!({ "name": hackathon.name, "status": hackathon.status })),
    )
    .await?;
    report.inserted += 1;
    Ok(())
}

fn read_task(record: &LegacyRecord<'_>, id: &str) -> std::result::Result<Parsed<NewTask>, String> {
    let Some(title) = record.text(&["title", "name"]) else {
        return Ok(Parsed::Rejected("task has no title".to_string()));
    };
    Ok(Parsed::Ready(NewTask {
        id: Some(id.to_string()),
        title,
        description: record.text(&["description"]),
        status: record.parsed(&["status"])?.unwrap_or(TaskStatus::Todo),
        priority: record.parsed(&["priority"])?,
        due_date: record.date(&["due_date", "dueDate", "deadline"])?,
        project_id: record.text(&["project_id", "projectId"]),
        hackathon_id: record.text(&["hackathon_id", "hackathonId"]),
    }))
}

async fn import_task(
    conn: &mut SqliteConnection,
    index: usize,
    value: &JsonValue,
    project_ids: &HashSet<String>,
    hackathon_ids: &HashSet<String>,
    report: &mut EntityImportReport,
) -> Result<()> {
    let Some((record, id)) = open(index, value, report) else {
        return Ok(());
    };
    if id_exists(&mut *conn, "tasks", &id).await? {
        report.skipped_existing += 1;
        return Ok(());
    }
    let task = match read_task(&record, &id) {
        Ok(Parsed::Ready(task)) => task,
        Ok(Parsed::Rejected(reason)) | Err(reason) => {
            reject(report, index, Some(id), reason);
            return Ok(());
        }
    };

    if task.project_id.is_some() && task.hackathon_id.is_some() {
        reject(
            report,
            index,
            Some(id),
            "task names both a project and a hackathon".to_string(),
        );
        return Ok(());
    }
    let orphaned = task
        .project_id
        .as_ref()
        .is_some_and(|project_id| !project_ids.contains(project_id))
        || task
            .hackathon_id
            .as_ref()
            .is_some_and(|hackathon_id| !hackathon_ids.contains(hackathon_id));
    if orphaned {
        warn!(index, task_id = %id, "Legacy task points at a missing project or hackathon");
        report.skipped_orphaned += 1;
        return Ok(());
    }

    insert_task(conn, task).await?;
    report.inserted += 1;
    Ok(())
}
