use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::dto::project_dto::{
    CreateProjectPayload, ProjectBatchPayload, ProjectBatchResponse, ProjectListQuery,
    UpdateProjectPayload,
};
use crate::error::{Error, Result};
use crate::models::audit_event::AuditEntity;
use crate::models::project::{Project, ProjectStatus};
use crate::models::task::TaskStatus;
use crate::services::audit_service::AuditService;
use crate::services::note_service::{insert_link, insert_note, LinkTarget};
use crate::services::task_service::{insert_task, NewTask};
use crate::utils::time::{new_id, now};

pub(crate) const PROJECT_COLUMNS: &str =
    "id, name, description, status, priority, deadline, repo_url, created_at, updated_at";

#[derive(Clone)]
pub struct ProjectService {
    pool: SqlitePool,
}

impl ProjectService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateProjectPayload) -> Result<Project> {
        let mut tx = self.pool.begin().await?;
        let project = insert_project(&mut tx, payload).await?;
        tx.commit().await?;

        info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn update(&self, id: &str, payload: UpdateProjectPayload) -> Result<Project> {
        let mut tx = self.pool.begin().await?;
        let project = update_project(&mut tx, id, payload).await?;
        tx.commit().await?;
        Ok(project)
    }

    pub async fn set_status(&self, id: &str, status: ProjectStatus) -> Result<Project> {
        let mut tx = self.pool.begin().await?;
        let current = fetch(&mut tx, id).await?;

        let query = format!(
            "UPDATE projects SET status = ?, updated_at = ? WHERE id = ? RETURNING {PROJECT_COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(status)
            .bind(now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        AuditService::record(
            &mut tx,
            AuditEntity::Project,
            id,
            "status_changed",
            Some(json!({ "from": current.status, "to": status })),
        )
        .await?;
        tx.commit().await?;

        info!(project_id = %id, from = %current.status, to = %status, "Project status changed");
        Ok(project)
    }

    pub async fn list(&self, query: ProjectListQuery) -> Result<Vec<Project>> {
        let projects = match query.status {
            Some(status) => {
                let sql = format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE status = ? ORDER BY deadline IS NULL, deadline ASC, name ASC"
                );
                sqlx::query_as::<_, Project>(&sql)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => self.list_all().await?,
        };
        Ok(projects)
    }

    pub async fn list_all(&self) -> Result<Vec<Project>> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY deadline IS NULL, deadline ASC, name ASC"
        );
        Ok(sqlx::query_as::<_, Project>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Project> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// Tasks and manual calendar events keep existing without the link;
    /// note links to the project go with it.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Project {} not found", id)));
        }
        AuditService::record(&mut tx, AuditEntity::Project, id, "deleted", None).await?;
        tx.commit().await?;

        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    /// Creates or updates a project together with its staged tasks, note
    /// links and new notes. Either everything is written or nothing is.
    pub async fn save_batch(&self, payload: ProjectBatchPayload) -> Result<ProjectBatchResponse> {
        // Staged tasks land in the project, so any hackathon on them would
        // give the task two contexts.
        if payload.tasks.iter().any(|task| task.hackathon_id.is_some()) {
            return Err(Error::InvariantViolation(
                "A task can belong to a project or a hackathon, not both".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let (project, created) = match payload.project_id.as_deref() {
            Some(id) => (update_project(&mut tx, id, payload.project).await?, false),
            None => {
                let fields = payload.project;
                let name = fields.name.ok_or_else(|| {
                    Error::BadRequest("A new project needs a name".to_string())
                })?;
                let create = CreateProjectPayload {
                    name,
                    description: fields.description,
                    status: fields.status,
                    priority: fields.priority,
                    deadline: fields.deadline.flatten(),
                    repo_url: fields.repo_url,
                };
                (insert_project(&mut tx, create).await?, true)
            }
        };

        let mut tasks = Vec::with_capacity(payload.tasks.len());
        for staged in payload.tasks {
            let task = insert_task(
                &mut tx,
                NewTask {
                    id: None,
                    title: staged.title.trim().to_string(),
                    description: staged.description,
                    status: staged.status.unwrap_or(TaskStatus::Todo),
                    priority: staged.priority,
                    due_date: staged.due_date,
                    project_id: Some(project.id.clone()),
                    hackathon_id: None,
                },
            )
            .await?;
            tasks.push(task);
        }

        let mut notes = Vec::with_capacity(payload.new_notes.len());
        let mut links = Vec::new();
        for new_note in payload.new_notes {
            let note = insert_note(&mut tx, new_note).await?;
            links.push(insert_link(&mut tx, &note.id, LinkTarget::Project(&project.id)).await?);
            notes.push(note);
        }
        for note_id in &payload.link_note_ids {
            links.push(insert_link(&mut tx, note_id, LinkTarget::Project(&project.id)).await?);
        }

        tx.commit().await?;

        info!(
            project_id = %project.id,
            created,
            tasks = tasks.len(),
            notes = notes.len(),
            links = links.len(),
            "Project batch saved"
        );
        Ok(ProjectBatchResponse {
            project,
            created,
            tasks,
            notes,
            links,
        })
    }
}

async fn insert_project(conn: &mut SqliteConnection, payload: CreateProjectPayload) -> Result<Project> {
    let timestamp = now();
    let query = format!(
        "INSERT INTO projects ({PROJECT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {PROJECT_COLUMNS}"
    );
    let project = sqlx::query_as::<_, Project>(&query)
        .bind(new_id())
        .bind(payload.name.trim())
        .bind(payload.description)
        .bind(payload.status.unwrap_or(ProjectStatus::Idea))
        .bind(payload.priority)
        .bind(payload.deadline)
        .bind(payload.repo_url)
        .bind(timestamp)
        .bind(timestamp)
        .fetch_one(&mut *conn)
        .await?;

    AuditService::record(
        conn,
        AuditEntity::Project,
        &project.id,
        "created",
        Some(json!({ "name": project.name, "status": project.status })),
    )
    .await?;
    Ok(project)
}

async fn update_project(
    conn: &mut SqliteConnection,
    id: &str,
    payload: UpdateProjectPayload,
) -> Result<Project> {
    let current = fetch(&mut *conn, id).await?;
    let changes = serde_json::to_value(&payload)?;

    let query = format!(
        r#"
        UPDATE projects
        SET
            name = COALESCE(?, name),
            description = COALESCE(?, description),
            status = COALESCE(?, status),
            priority = COALESCE(?, priority),
            deadline = ?,
            repo_url = COALESCE(?, repo_url),
            updated_at = ?
        WHERE id = ?
        RETURNING {PROJECT_COLUMNS}
        "#
    );
    let project = sqlx::query_as::<_, Project>(&query)
        .bind(payload.name.map(|name| name.trim().to_string()))
        .bind(payload.description)
        .bind(payload.status)
        .bind(payload.priority)
        .bind(payload.deadline.unwrap_or(current.deadline))
        .bind(payload.repo_url)
        .bind(now())
        .bind(&current.id)
        .fetch_one(&mut *conn)
        .await?;

    AuditService::record(conn, AuditEntity::Project, id, "updated", Some(changes)).await?;
    Ok(project)
}

async fn fetch(conn: &mut SqliteConnection, id: &str) -> Result<Project> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?");
    sqlx::query_as::<_, Project>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Project {} not found", id)))
}
