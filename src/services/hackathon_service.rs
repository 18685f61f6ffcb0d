use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::dto::hackathon_dto::{
    CreateHackathonPayload, HackathonListQuery, UpdateHackathonPayload,
};
use crate::error::{Error, Result};
use crate::models::audit_event::AuditEntity;
use crate::models::hackathon::{Hackathon, HackathonStatus};
use crate::services::audit_service::AuditService;
use crate::utils::time::{new_id, now};

pub(crate) const HACKATHON_COLUMNS: &str = "id, name, organizer, website, status, priority, registration_deadline, submission_deadline, start_date, end_date, notes, created_at, updated_at";

#[derive(Clone)]
pub struct HackathonService {
    pool: SqlitePool,
}

impl HackathonService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateHackathonPayload) -> Result<Hackathon> {
        ensure_dates_ordered(payload.start_date, payload.end_date)?;

        let status = payload.status.unwrap_or(HackathonStatus::Discovered);
        let timestamp = now();
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO hackathons ({HACKATHON_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {HACKATHON_COLUMNS}"
        );
        let hackathon = sqlx::query_as::<_, Hackathon>(&query)
            .bind(new_id())
            .bind(payload.name.trim())
            .bind(payload.organizer)
            .bind(payload.website)
            .bind(status)
            .bind(payload.priority)
            .bind(payload.registration_deadline)
            .bind(payload.submission_deadline)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(payload.notes)
            .bind(timestamp)
            .bind(timestamp)
            .fetch_one(&mut *tx)
            .await?;

        AuditService::record(
            &mut tx,
            AuditEntity::Hackathon,
            &hackathon.id,
            "created",
            Some(json!({ "name": hackathon.name, "status": hackathon.status })),
        )
        .await?;
        tx.commit().await?;

        info!(hackathon_id = %hackathon.id, "Hackathon created");
        Ok(hackathon)
    }

    pub async fn update(&self, id: &str, payload: UpdateHackathonPayload) -> Result<Hackathon> {
        let mut tx = self.pool.begin().await?;
        let current = fetch(&mut tx, id).await?;
        // An explicit null clears a date; an absent field keeps it.
        let registration_deadline = payload
            .registration_deadline
            .unwrap_or(current.registration_deadline);
        let submission_deadline = payload
            .submission_deadline
            .unwrap_or(current.submission_deadline);
        let start_date = payload.start_date.unwrap_or(current.start_date);
        let end_date = payload.end_date.unwrap_or(current.end_date);
        ensure_dates_ordered(start_date, end_date)?;

        let changes = serde_json::to_value(&payload)?;
        let query = format!(
            r#"
            UPDATE hackathons
            SET
                name = COALESCE(?, name),
                organizer = COALESCE(?, organizer),
                website = COALESCE(?, website),
                priority = COALESCE(?, priority),
                registration_deadline = ?,
                submission_deadline = ?,
                start_date = ?,
                end_date = ?,
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ?
            RETURNING {HACKATHON_COLUMNS}
            "#
        );
        let hackathon = sqlx::query_as::<_, Hackathon>(&query)
            .bind(payload.name.map(|name| name.trim().to_string()))
            .bind(payload.organizer)
            .bind(payload.website)
            .bind(payload.priority)
            .bind(registration_deadline)
            .bind(submission_deadline)
            .bind(start_date)
            .bind(end_date)
            .bind(payload.notes)
            .bind(now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        AuditService::record(&mut tx, AuditEntity::Hackathon, id, "updated", Some(changes)).await?;
        tx.commit().await?;

        Ok(hackathon)
    }

    /// Any status may be assigned from any other; transitions are user decisions.
    pub async fn set_status(&self, id: &str, status: HackathonStatus) -> Result<Hackathon> {
        let mut tx = self.pool.begin().await?;
        let current = fetch(&mut tx, id).await?;

        let query = format!(
            "UPDATE hackathons SET status = ?, updated_at = ? WHERE id = ? RETURNING {HACKATHON_COLUMNS}"
        );
        let hackathon = sqlx::query_as::<_, Hackathon>(&query)
            .bind(status)
            .bind(now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        AuditService::record(
            &mut tx,
            AuditEntity::Hackathon,
            id,
            "status_changed",
            Some(json!({ "from": current.status, "to": status })),
        )
        .await?;
        tx.commit().await?;

        info!(hackathon_id = %id, from = %current.status, to = %status, "Hackathon status changed");
        Ok(hackathon)
    }

    pub async fn list(&self, query: HackathonListQuery) -> Result<Vec<Hackathon>> {
        let hackathons = match query.status {
            Some(status) => {
                let sql = format!(
                    "SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE status = ? ORDER BY COALESCE(submission_deadline, end_date, start_date) ASC, name ASC"
                );
                sqlx::query_as::<_, Hackathon>(&sql)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => self.list_all().await?,
        };
        Ok(hackathons)
    }

    pub async fn list_all(&self) -> Result<Vec<Hackathon>> {
        let sql = format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons ORDER BY COALESCE(submission_deadline, end_date, start_date) ASC, name ASC"
        );
        Ok(sqlx::query_as::<_, Hackathon>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Hackathon> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// Tasks and manual calendar events keep existing without the link;
    /// note links to the hackathon go with it.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query("DELETE FROM hackathons WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Hackathon {} not found", id)));
        }
        AuditService::record(&mut tx, AuditEntity::Hackathon, id, "deleted", None).await?;
        tx.commit().await?;

        info!(hackathon_id = %id, "Hackathon deleted");
        Ok(())
    }
}

async fn fetch(conn: &mut SqliteConnection, id: &str) -> Result<Hackathon> {
    let sql = format!("SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE id = ?");
    sqlx::query_as::<_, Hackathon>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Hackathon {} not found", id)))
}

fn ensure_dates_ordered(
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(Error::BadRequest(format!(
                "Hackathon starts on {} but ends on {}",
                start, end
            )));
        }
    }
    Ok(())
}
