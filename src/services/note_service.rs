use sqlx::{SqliteConnection, SqlitePool};

use crate::dto::note_dto::{
    CreateNotePayload, LinkNotePayload, NoteDetailResponse, NoteListQuery, UpdateNotePayload,
};
use crate::error::{Error, Result};
use crate::models::note::{Note, NoteLink};
use crate::utils::time::{new_id, now};

const NOTE_COLUMNS: &str = "id, title, content, pinned, created_at, updated_at";
const LINK_COLUMNS: &str = "id, note_id, project_id, hackathon_id, created_at";

/// What a note link points at.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LinkTarget<'a> {
    Project(&'a str),
    Hackathon(&'a str),
}

impl<'a> LinkTarget<'a> {
    pub(crate) fn from_payload(payload: &'a LinkNotePayload) -> Result<Self> {
        match (payload.project_id.as_deref(), payload.hackathon_id.as_deref()) {
            (Some(project_id), None) => Ok(Self::Project(project_id)),
            (None, Some(hackathon_id)) => Ok(Self::Hackathon(hackathon_id)),
            (Some(_), Some(_)) => Err(Error::InvariantViolation(
                "A note link targets a project or a hackathon, not both".to_string(),
            )),
            (None, None) => Err(Error::BadRequest(
                "A note link needs a project_id or a hackathon_id".to_string(),
            )),
        }
    }
}

#[derive(Clone)]
pub struct NoteService {
    pool: SqlitePool,
}

impl NoteService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateNotePayload) -> Result<Note> {
        let mut conn = self.pool.acquire().await?;
        insert_note(&mut conn, payload).await
    }

    pub async fn update(&self, id: &str, payload: UpdateNotePayload) -> Result<Note> {
        let query = format!(
            r#"
            UPDATE notes
            SET
                title = COALESCE(?, title),
                content = COALESCE(?, content),
                pinned = COALESCE(?, pinned),
                updated_at = ?
            WHERE id = ?
            RETURNING {NOTE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(payload.title.map(|title| title.trim().to_string()))
            .bind(payload.content)
            .bind(payload.pinned)
            .bind(now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))
    }

    /// Pinned notes first, then most recently edited.
    pub async fn list(&self, query: NoteListQuery) -> Result<Vec<Note>> {
        let mut filters = Vec::new();
        if query.project_id.is_some() {
            filters.push("id IN (SELECT note_id FROM note_links WHERE project_id = ?)");
        }
        if query.hackathon_id.is_some() {
            filters.push("id IN (SELECT note_id FROM note_links WHERE hackathon_id = ?)");
        }
        if query.pinned.is_some() {
            filters.push("pinned = ?");
        }
        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes {} ORDER BY pinned DESC, updated_at DESC",
            where_clause
        );
        let mut statement = sqlx::query_as::<_, Note>(&sql);
        if let Some(project_id) = query.project_id {
            statement = statement.bind(project_id);
        }
        if let Some(hackathon_id) = query.hackathon_id {
            statement = statement.bind(hackathon_id);
        }
        if let Some(pinned) = query.pinned {
            statement = statement.bind(pinned);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Note> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?");
        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))
    }

    pub async fn detail(&self, id: &str) -> Result<NoteDetailResponse> {
        let note = self.get_by_id(id).await?;
        let links = self.links_for(id).await?;
        Ok(NoteDetailResponse { note, links })
    }

    pub async fn links_for(&self, note_id: &str) -> Result<Vec<NoteLink>> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM note_links WHERE note_id = ? ORDER BY created_at ASC, rowid ASC"
        );
        Ok(sqlx::query_as::<_, NoteLink>(&sql)
            .bind(note_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn notes_for_project(&self, project_id: &str) -> Result<Vec<Note>> {
        self.list(NoteListQuery {
            project_id: Some(project_id.to_string()),
            ..NoteListQuery::default()
        })
        .await
    }

    pub async fn link(&self, note_id: &str, payload: LinkNotePayload) -> Result<NoteLink> {
        let target = LinkTarget::from_payload(&payload)?;
        let mut tx = self.pool.begin().await?;
        let link = insert_link(&mut tx, note_id, target).await?;
        tx.commit().await?;
        Ok(link)
    }

    pub async fn unlink(&self, note_id: &str, link_id: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM note_links WHERE id = ? AND note_id = ?")
            .bind(link_id)
            .bind(note_id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Link {} on note {} not found",
                link_id, note_id
            )));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }
}

pub(crate) async fn insert_note(conn: &mut SqliteConnection, payload: CreateNotePayload) -> Result<Note> {
    let timestamp = now();
    let query = format!(
        "INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {NOTE_COLUMNS}"
    );
    let note = sqlx::query_as::<_, Note>(&query)
        .bind(new_id())
        .bind(payload.title.trim())
        .bind(payload.content)
        .bind(payload.pinned)
        .bind(timestamp)
        .bind(timestamp)
        .fetch_one(conn)
        .await?;
    Ok(note)
}

/// Linking twice to the same target returns the existing link.
pub(crate) async fn insert_link(
    conn: &mut SqliteConnection,
    note_id: &str,
    target: LinkTarget<'_>,
) -> Result<NoteLink> {
    let note: Option<String> = sqlx::query_scalar("SELECT id FROM notes WHERE id = ?")
        .bind(note_id)
        .fetch_optional(&mut *conn)
        .await?;
    if note.is_none() {
        return Err(Error::NotFound(format!("Note {} not found", note_id)));
    }

    let (project_id, hackathon_id, table, column, target_id) = match target {
        LinkTarget::Project(id) => (Some(id), None, "projects", "project_id", id),
        LinkTarget::Hackathon(id) => (None, Some(id), "hackathons", "hackathon_id", id),
    };

    let exists_sql = format!("SELECT id FROM {} WHERE id = ?", table);
    let found: Option<String> = sqlx::query_scalar(&exists_sql)
        .bind(target_id)
        .fetch_optional(&mut *conn)
        .await?;
    if found.is_none() {
        return Err(Error::NotFound(format!(
            "Link target {} not found in {}",
            target_id, table
        )));
    }

    let existing_sql = format!(
        "SELECT {LINK_COLUMNS} FROM note_links WHERE note_id = ? AND {} = ?",
        column
    );
    let existing = sqlx::query_as::<_, NoteLink>(&existing_sql)
        .bind(note_id)
        .bind(target_id)
        .fetch_optional(&mut *conn)
        .await?;
    if let Some(existing) = existing {
        return Ok(existing);
    }

    let insert_sql = format!(
        "INSERT INTO note_links ({LINK_COLUMNS}) VALUES (?, ?, ?, ?, ?) RETURNING {LINK_COLUMNS}"
    );
    let link = sqlx::query_as::<_, NoteLink>(&insert_sql)
        .bind(new_id())
        .bind(note_id)
        .bind(project_id)
        .bind(hackathon_id)
        .bind(now())
        .fetch_one(&mut *conn)
        .await?;
    Ok(link)
}
