use crate::error::Result;
use crate::models::audit_event::{AuditEntity, AuditEvent};
use crate::utils::time::{new_id, now};
use serde_json::Value as JsonValue;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone)]
pub struct AuditService {
    pool: SqlitePool,
}

impl AuditService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes on the caller's connection so the event commits together with
    /// the mutation it describes.
    pub async fn record(
        conn: &mut SqliteConnection,
        entity: AuditEntity,
        entity_id: &str,
        action: &str,
        changes: Option<JsonValue>,
    ) -> Result<()> {
        let query = format!(
            "INSERT INTO {} (id, entity_id, action, changes, created_at) VALUES (?, ?, ?, ?, ?)",
            entity.table()
        );
        sqlx::query(&query)
            .bind(new_id())
            .bind(entity_id)
            .bind(action)
            .bind(changes)
            .bind(now())
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn history(&self, entity: AuditEntity, entity_id: &str) -> Result<Vec<AuditEvent>> {
        let query = format!(
            "SELECT id, entity_id, action, changes, created_at FROM {} WHERE entity_id = ? ORDER BY created_at ASC, rowid ASC",
            entity.table()
        );
        let events = sqlx::query_as::<_, AuditEvent>(&query)
            .bind(entity_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn list_all(&self, entity: AuditEntity) -> Result<Vec<AuditEvent>> {
        let query = format!(
            "SELECT id, entity_id, action, changes, created_at FROM {} ORDER BY created_at ASC, rowid ASC",
            entity.table()
        );
        let events = sqlx::query_as::<_, AuditEvent>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }
}
