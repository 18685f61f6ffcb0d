use crate::dto::attendance_dto::CreateSlotPayload;
use crate::dto::subject_dto::{
    CreateFacultyPayload, CreateSubjectPayload, UpdateFacultyPayload, UpdateSubjectPayload,
};
use crate::error::{Error, Result};
use crate::models::faculty::Faculty;
use crate::models::subject::{Subject, SubjectType};
use crate::models::timetable::TimetableSlot;
use crate::utils::time::{new_id, now};
use sqlx::SqlitePool;

const SUBJECT_COLUMNS: &str = "id, name, code, subject_type, faculty_id, created_at, updated_at";
const SLOT_COLUMNS: &str = "id, subject_id, weekday, start_time, end_time, room, created_at";

#[derive(Clone)]
pub struct SubjectService {
    pool: SqlitePool,
}

impl SubjectService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_faculty(&self, payload: CreateFacultyPayload) -> Result<Faculty> {
        let faculty = sqlx::query_as::<_, Faculty>(
            r#"
            INSERT INTO faculty (id, name, email, department, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, department, created_at
            "#,
        )
        .bind(new_id())
        .bind(payload.name.trim())
        .bind(payload.email)
        .bind(payload.department)
        .bind(now())
        .fetch_one(&self.pool)
        .await?;

        Ok(faculty)
    }

    pub async fn update_faculty(&self, id: &str, payload: UpdateFacultyPayload) -> Result<Faculty> {
        let faculty = sqlx::query_as::<_, Faculty>(
            r#"
            UPDATE faculty
            SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                department = COALESCE(?, department)
            WHERE id = ?
            RETURNING id, name, email, department, created_at
            "#,
        )
        .bind(payload.name.map(|name| name.trim().to_string()))
        .bind(payload.email)
        .bind(payload.department)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Faculty {} not found", id)))?;

        Ok(faculty)
    }

    pub async fn list_faculty(&self) -> Result<Vec<Faculty>> {
        let faculty = sqlx::query_as::<_, Faculty>(
            "SELECT id, name, email, department, created_at FROM faculty ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(faculty)
    }

    pub async fn get_faculty(&self, id: &str) -> Result<Faculty> {
        sqlx::query_as::<_, Faculty>(
            "SELECT id, name, email, department, created_at FROM faculty WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Faculty {} not found", id)))
    }

    /// Subjects taught by the removed faculty keep existing with no faculty assigned.
    pub async fn delete_faculty(&self, id: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM faculty WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Faculty {} not found", id)));
        }
        Ok(())
    }

    pub async fn create_subject(&self, payload: CreateSubjectPayload) -> Result<Subject> {
        if let Some(faculty_id) = payload.faculty_id.as_deref() {
            self.get_faculty(faculty_id).await?;
        }
        let code = payload.code.trim().to_uppercase();
        self.ensure_code_free(&code, None).await?;

        let timestamp = now();
        let query = format!(
            "INSERT INTO subjects ({SUBJECT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {SUBJECT_COLUMNS}"
        );
        let subject = sqlx::query_as::<_, Subject>(&query)
            .bind(new_id())
            .bind(payload.name.trim())
            .bind(code)
            .bind(payload.subject_type.unwrap_or(SubjectType::Lecture))
            .bind(payload.faculty_id)
            .bind(timestamp)
            .bind(timestamp)
            .fetch_one(&self.pool)
            .await?;

        Ok(subject)
    }

    pub async fn update_subject(&self, id: &str, payload: UpdateSubjectPayload) -> Result<Subject> {
        self.get_subject(id).await?;
        if let Some(faculty_id) = payload.faculty_id.as_deref() {
            self.get_faculty(faculty_id).await?;
        }
        let code = payload.code.map(|code| code.trim().to_uppercase());
        if let Some(code) = code.as_deref() {
            self.ensure_code_free(code, Some(id)).await?;
        }

        let query = format!(
            r#"
            UPDATE subjects
            SET
                name = COALESCE(?, name),
                code = COALESCE(?, code),
                subject_type = COALESCE(?, subject_type),
                faculty_id = COALESCE(?, faculty_id),
                updated_at = ?
            WHERE id = ?
            RETURNING {SUBJECT_COLUMNS}
            "#
        );
        let subject = sqlx::query_as::<_, Subject>(&query)
            .bind(payload.name.map(|name| name.trim().to_string()))
            .bind(code)
            .bind(payload.subject_type)
            .bind(payload.faculty_id)
            .bind(now())
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(subject)
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let query = format!("SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY code ASC");
        let subjects = sqlx::query_as::<_, Subject>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(subjects)
    }

    pub async fn get_subject(&self, id: &str) -> Result<Subject> {
        let query = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = ?");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Subject {} not found", id)))
    }

    /// Recorded attendance is never discarded implicitly, so a subject with
    /// class instances cannot be removed.
    pub async fn delete_subject(&self, id: &str) -> Result<()> {
        self.get_subject(id).await?;

        let instances: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM class_instances WHERE subject_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if instances > 0 {
            return Err(Error::InvariantViolation(format!(
                "Subject {} has {} class instances and cannot be deleted",
                id, instances
            )));
        }

        sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_slot(&self, payload: CreateSlotPayload) -> Result<TimetableSlot> {
        if payload.end_time <= payload.start_time {
            return Err(Error::BadRequest(
                "Slot end_time must be after start_time".to_string(),
            ));
        }
        self.get_subject(&payload.subject_id).await?;

        let query = format!(
            "INSERT INTO timetable_slots ({SLOT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {SLOT_COLUMNS}"
        );
        let slot = sqlx::query_as::<_, TimetableSlot>(&query)
            .bind(new_id())
            .bind(&payload.subject_id)
            .bind(payload.weekday)
            .bind(payload.start_time)
            .bind(payload.end_time)
            .bind(payload.room)
            .bind(now())
            .fetch_one(&self.pool)
            .await?;

        Ok(slot)
    }

    pub async fn list_slots(&self, subject_id: Option<&str>) -> Result<Vec<TimetableSlot>> {
        let slots = match subject_id {
            Some(subject_id) => {
                let query = format!(
                    "SELECT {SLOT_COLUMNS} FROM timetable_slots WHERE subject_id = ? ORDER BY weekday ASC, start_time ASC"
                );
                sqlx::query_as::<_, TimetableSlot>(&query)
                    .bind(subject_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {SLOT_COLUMNS} FROM timetable_slots ORDER BY weekday ASC, start_time ASC"
                );
                sqlx::query_as::<_, TimetableSlot>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(slots)
    }

    /// Instances generated from the slot stay, detached from it.
    pub async fn delete_slot(&self, id: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM timetable_slots WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Timetable slot {} not found", id)));
        }
        Ok(())
    }

    async fn ensure_code_free(&self, code: &str, except_id: Option<&str>) -> Result<()> {
        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM subjects WHERE code = ?")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        match existing {
            Some(existing) if Some(existing.as_str()) != except_id => Err(Error::BadRequest(
                format!("Subject code {} is already in use", code),
            )),
            _ => Ok(()),
        }
    }
}
