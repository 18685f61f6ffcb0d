use std::collections::BTreeMap;

use sqlx::SqlitePool;
use tracing::info;

use crate::dto::application_dto::{
    ApplicationListQuery, CreateApplicationPayload, UpdateApplicationPayload,
};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationKind, ApplicationStage};
use crate::utils::time::{new_id, now, today};

const APPLICATION_COLUMNS: &str = "id, company, role, kind, stage, location, url, applied_on, deadline, notes, created_at, updated_at";

#[derive(Clone)]
pub struct ApplicationService {
    pool: SqlitePool,
}

impl ApplicationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateApplicationPayload) -> Result<Application> {
        let stage = payload.stage.unwrap_or(ApplicationStage::Wishlist);
        let applied_on = payload
            .applied_on
            .or_else(|| (stage != ApplicationStage::Wishlist).then(today));
        let timestamp = now();

        let query = format!(
            "INSERT INTO applications ({APPLICATION_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {APPLICATION_COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(new_id())
            .bind(payload.company.trim())
            .bind(payload.role.trim())
            .bind(payload.kind.unwrap_or(ApplicationKind::Internship))
            .bind(stage)
            .bind(payload.location)
            .bind(payload.url)
            .bind(applied_on)
            .bind(payload.deadline)
            .bind(payload.notes)
            .bind(timestamp)
            .bind(timestamp)
            .fetch_one(&self.pool)
            .await?;

        info!(application_id = %application.id, company = %application.company, "Application created");
        Ok(application)
    }

    pub async fn update(&self, id: &str, payload: UpdateApplicationPayload) -> Result<Application> {
        let query = format!(
            r#"
            UPDATE applications
            SET
                company = COALESCE(?, company),
                role = COALESCE(?, role),
                kind = COALESCE(?, kind),
                location = COALESCE(?, location),
                url = COALESCE(?, url),
                applied_on = COALESCE(?, applied_on),
                deadline = COALESCE(?, deadline),
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ?
            RETURNING {APPLICATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(payload.company.map(|company| company.trim().to_string()))
            .bind(payload.role.map(|role| role.trim().to_string()))
            .bind(payload.kind)
            .bind(payload.location)
            .bind(payload.url)
            .bind(payload.applied_on)
            .bind(payload.deadline)
            .bind(payload.notes)
            .bind(now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    /// Leaving the wishlist stamps `applied_on` unless one was recorded.
    pub async fn set_stage(&self, id: &str, stage: ApplicationStage) -> Result<Application> {
        let current = self.get_by_id(id).await?;
        let applied_on = current
            .applied_on
            .or_else(|| (stage != ApplicationStage::Wishlist).then(today));

        let query = format!(
            "UPDATE applications SET stage = ?, applied_on = ?, updated_at = ? WHERE id = ? RETURNING {APPLICATION_COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(stage)
            .bind(applied_on)
            .bind(now())
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        info!(application_id = %id, from = %current.stage, to = %stage, "Application stage changed");
        Ok(application)
    }

    pub async fn list(&self, query: ApplicationListQuery) -> Result<Vec<Application>> {
        let mut filters = Vec::new();
        if query.stage.is_some() {
            filters.push("stage = ?");
        }
        if query.kind.is_some() {
            filters.push("kind = ?");
        }
        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications {} ORDER BY deadline IS NULL, deadline ASC, updated_at DESC",
            where_clause
        );
        let mut statement = sqlx::query_as::<_, Application>(&sql);
        if let Some(stage) = query.stage {
            statement = statement.bind(stage);
        }
        if let Some(kind) = query.kind {
            statement = statement.bind(kind);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Application> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?");
        sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM applications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Application {} not found", id)));
        }
        Ok(())
    }

    pub async fn count_by_stage(&self) -> Result<BTreeMap<String, i64>> {
        let rows: Vec<(ApplicationStage, i64)> =
            sqlx::query_as("SELECT stage, COUNT(*) FROM applications GROUP BY stage")
                .fetch_all(&self.pool)
                .await?;
        let mut counts: BTreeMap<String, i64> = ApplicationStage::ALL
            .iter()
            .map(|stage| (stage.to_string(), 0))
            .collect();
        for (stage, count) in rows {
            counts.insert(stage.to_string(), count);
        }
        Ok(counts)
    }
}
