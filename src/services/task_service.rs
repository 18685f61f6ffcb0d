use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::dto::task_dto::{CreateTaskPayload, TaskListQuery, UpdateTaskPayload};
use crate::error::{Error, Result};
use crate::models::audit_event::AuditEntity;
use crate::models::priority::Priority;
use crate::models::task::{Task, TaskStatus};
use crate::services::audit_service::AuditService;
use crate::utils::time::{new_id, now};
use crate::utils::validation::ensure_single_context;

pub(crate) const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, project_id, hackathon_id, completed_at, created_at, updated_at";

/// Field values for a task about to be written, whichever path produced it.
#[derive(Debug, Clone)]
pub(crate) struct NewTask {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub hackathon_id: Option<String>,
}

impl From<CreateTaskPayload> for NewTask {
    fn from(payload: CreateTaskPayload) -> Self {
        Self {
            id: None,
            title: payload.title.trim().to_string(),
            description: payload.description,
            status: payload.status.unwrap_or(TaskStatus::Todo),
            priority: payload.priority,
            due_date: payload.due_date,
            project_id: payload.project_id,
            hackathon_id: payload.hackathon_id,
        }
    }
}

#[derive(Clone)]
pub struct TaskService {
    pool: SqlitePool,
}

impl TaskService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateTaskPayload) -> Result<Task> {
        ensure_single_context(payload.project_id.as_deref(), payload.hackathon_id.as_deref())?;

        let mut tx = self.pool.begin().await?;
        ensure_context_exists(
            &mut tx,
            payload.project_id.as_deref(),
            payload.hackathon_id.as_deref(),
        )
        .await?;
        let task = insert_task(&mut tx, NewTask::from(payload)).await?;
        tx.commit().await?;

        info!(task_id = %task.id, "Task created");
        Ok(task)
    }

    pub async fn update(&self, id: &str, payload: UpdateTaskPayload) -> Result<Task> {
        ensure_single_context(payload.project_id.as_deref(), payload.hackathon_id.as_deref())?;
        if payload.detach && (payload.project_id.is_some() || payload.hackathon_id.is_some()) {
            return Err(Error::BadRequest(
                "detach cannot be combined with a new project or hackathon".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let current = fetch(&mut tx, id).await?;

        let (project_id, hackathon_id) = if payload.detach {
            (None, None)
        } else if payload.project_id.is_some() {
            (payload.project_id.clone(), None)
        } else if payload.hackathon_id.is_some() {
            (None, payload.hackathon_id.clone())
        } else {
            (current.project_id.clone(), current.hackathon_id.clone())
        };
        ensure_context_exists(&mut tx, project_id.as_deref(), hackathon_id.as_deref()).await?;

        let changes = serde_json::to_value(&payload)?;
        let query = format!(
            r#"
            UPDATE tasks
            SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                priority = COALESCE(?, priority),
                due_date = COALESCE(?, due_date),
                project_id = ?,
                hackathon_id = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING {TASK_COLUMNS}
            "#
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(payload.title.map(|title| title.trim().to_string()))
            .bind(payload.description)
            .bind(payload.priority)
            .bind(payload.due_date)
            .bind(project_id)
            .bind(hackathon_id)
            .bind(now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        AuditService::record(&mut tx, AuditEntity::Task, id, "updated", Some(changes)).await?;
        tx.commit().await?;

        Ok(task)
    }

    /// `completed_at` follows the status: stamped on entering `done`,
    /// cleared on leaving it.
    pub async fn set_status(&self, id: &str, status: TaskStatus) -> Result<Task> {
        let mut tx = self.pool.begin().await?;
        let current = fetch(&mut tx, id).await?;

        let completed_at = match (current.status, status) {
            (TaskStatus::Done, TaskStatus::Done) => current.completed_at,
            (_, TaskStatus::Done) => Some(now()),
            _ => None,
        };

        let query = format!(
            "UPDATE tasks SET status = ?, completed_at = ?, updated_at = ? WHERE id = ? RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(status)
            .bind(completed_at)
            .bind(now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        AuditService::record(
            &mut tx,
            AuditEntity::Task,
            id,
            "status_changed",
            Some(json!({ "from": current.status, "to": status })),
        )
        .await?;
        tx.commit().await?;

        info!(task_id = %id, from = %current.status, to = %status, "Task status changed");
        Ok(task)
    }

    pub async fn list(&self, query: TaskListQuery) -> Result<Vec<Task>> {
        let mut filters = Vec::new();
        if query.status.is_some() {
            filters.push("status = ?");
        }
        if query.project_id.is_some() {
            filters.push("project_id = ?");
        }
        if query.hackathon_id.is_some() {
            filters.push("hackathon_id = ?");
        }
        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks {} ORDER BY due_date IS NULL, due_date ASC, created_at ASC",
            where_clause
        );
        let mut statement = sqlx::query_as::<_, Task>(&sql);
        if let Some(status) = query.status {
            statement = statement.bind(status);
        }
        if let Some(project_id) = query.project_id {
            statement = statement.bind(project_id);
        }
        if let Some(hackathon_id) = query.hackathon_id {
            statement = statement.bind(hackathon_id);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Task> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Task {} not found", id)));
        }
        AuditService::record(&mut tx, AuditEntity::Task, id, "deleted", None).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn count_by_status(&self) -> Result<BTreeMap<String, i64>> {
        let rows: Vec<(TaskStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM tasks GROUP BY status")
                .fetch_all(&self.pool)
                .await?;
        let mut counts: BTreeMap<String, i64> = TaskStatus::ALL
            .iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for (status, count) in rows {
            counts.insert(status.to_string(), count);
        }
        Ok(counts)
    }
}

/// Inserts a task and its `created` audit event on the caller's connection.
/// The single-context rule is checked again here so no path can skip it.
pub(crate) async fn insert_task(conn: &mut SqliteConnection, task: NewTask) -> Result<Task> {
    ensure_single_context(task.project_id.as_deref(), task.hackathon_id.as_deref())?;

    let completed_at = (task.status == TaskStatus::Done).then(now);
    let timestamp = now();
    let query = format!(
        "INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {TASK_COLUMNS}"
    );
    let created = sqlx::query_as::<_, Task>(&query)
        .bind(task.id.unwrap_or_else(new_id))
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.project_id)
        .bind(task.hackathon_id)
        .bind(completed_at)
        .bind(timestamp)
        .bind(timestamp)
        .fetch_one(&mut *conn)
        .await?;

    AuditService::record(
        conn,
        AuditEntity::Task,
        &created.id,
        "created",
        Some(json!({
            "title": created.title,
            "status": created.status,
            "project_id": created.project_id,
            "hackathon_id": created.hackathon_id,
        })),
    )
    .await?;

    Ok(created)
}

async fn ensure_context_exists(
    conn: &mut SqliteConnection,
    project_id: Option<&str>,
    hackathon_id: Option<&str>,
) -> Result<()> {
    if let Some(project_id) = project_id {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            return Err(Error::NotFound(format!("Project {} not found", project_id)));
        }
    }
    if let Some(hackathon_id) = hackathon_id {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM hackathons WHERE id = ?")
            .bind(hackathon_id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            return Err(Error::NotFound(format!("Hackathon {} not found", hackathon_id)));
        }
    }
    Ok(())
}

async fn fetch(conn: &mut SqliteConnection, id: &str) -> Result<Task> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");
    sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Task {} not found", id)))
}
