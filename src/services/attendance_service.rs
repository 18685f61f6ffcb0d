use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;
use tracing::info;

use crate::dto::attendance_dto::{
    AttendanceOverviewResponse, ClassInstanceQuery, CreateClassInstancePayload,
    GenerateInstancesResponse, MarkAttendancePayload, SubjectAttendanceResponse,
};
use crate::error::{Error, Result};
use crate::models::class_instance::{AttendanceStatus, ClassInstance};
use crate::models::subject::Subject;
use crate::models::timetable::TimetableSlot;
use crate::services::attendance_risk::{AttendancePolicy, AttendanceTally, RiskState};
use crate::utils::time::{new_id, now};

const INSTANCE_COLUMNS: &str =
    "id, subject_id, slot_id, class_date, start_time, end_time, status, reason_code, marked_at, created_at";

/// Longest range a single generate request may expand.
pub const MAX_GENERATE_DAYS: i64 = 366;

#[derive(Clone)]
pub struct AttendanceService {
    pool: SqlitePool,
    policy: AttendancePolicy,
}

impl AttendanceService {
    pub fn new(pool: SqlitePool, policy: AttendancePolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> &AttendancePolicy {
        &self.policy
    }

    /// Expands the weekly timetable into class instances for every day in
    /// `[from, to]`. Rows that already exist are left untouched, so running
    /// the same range twice creates nothing new.
    pub async fn generate(&self, from: NaiveDate, to: NaiveDate) -> Result<GenerateInstancesResponse> {
        if to < from {
            return Err(Error::BadRequest("Range end is before its start".to_string()));
        }
        let span = (to - from).num_days() + 1;
        if span > MAX_GENERATE_DAYS {
            return Err(Error::BadRequest(format!(
                "Range covers {} days; at most {} can be generated at once",
                span, MAX_GENERATE_DAYS
            )));
        }

        let slots = sqlx::query_as::<_, TimetableSlot>(
            "SELECT id, subject_id, weekday, start_time, end_time, room, created_at FROM timetable_slots",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_weekday: HashMap<i64, Vec<&TimetableSlot>> = HashMap::new();
        for slot in &slots {
            by_weekday.entry(slot.weekday).or_default().push(slot);
        }

        let mut tx = self.pool.begin().await?;
        let mut attempted = 0u64;
        let mut created = 0u64;
        for date in from.iter_days().take(span as usize) {
            let weekday = i64::from(date.weekday().num_days_from_monday());
            let Some(day_slots) = by_weekday.get(&weekday) else {
                continue;
            };
            for slot in day_slots {
                attempted += 1;
                let res = sqlx::query(
                    r#"
                    INSERT INTO class_instances
                        (id, subject_id, slot_id, class_date, start_time, end_time, status, created_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    ON CONFLICT (subject_id, class_date, start_time) DO NOTHING
                    "#,
                )
                .bind(new_id())
                .bind(&slot.subject_id)
                .bind(&slot.id)
                .bind(date)
                .bind(slot.start_time)
                .bind(slot.end_time)
                .bind(AttendanceStatus::Unmarked)
                .bind(now())
                .execute(&mut *tx)
                .await?;
                created += res.rows_affected();
            }
        }
        tx.commit().await?;

        info!(%from, %to, created, "Generated class instances");
        Ok(GenerateInstancesResponse {
            from,
            to,
            created,
            already_present: attempted - created,
        })
    }

    /// Ad-hoc instance outside the timetable. Returns the existing row when
    /// the natural key is already taken; the flag tells whether one was made.
    pub async fn create_instance(
        &self,
        payload: CreateClassInstancePayload,
    ) -> Result<(ClassInstance, bool)> {
        if payload.end_time <= payload.start_time {
            return Err(Error::BadRequest(
                "Class end_time must be after start_time".to_string(),
            ));
        }
        let subject_exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM subjects WHERE id = ?")
                .bind(&payload.subject_id)
                .fetch_optional(&self.pool)
                .await?;
        if subject_exists.is_none() {
            return Err(Error::NotFound(format!(
                "Subject {} not found",
                payload.subject_id
            )));
        }

        let res = sqlx::query(
            r#"
            INSERT INTO class_instances
                (id, subject_id, class_date, start_time, end_time, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (subject_id, class_date, start_time) DO NOTHING
            "#,
        )
        .bind(new_id())
        .bind(&payload.subject_id)
        .bind(payload.class_date)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .bind(AttendanceStatus::Unmarked)
        .bind(now())
        .execute(&self.pool)
        .await?;

        let query = format!(
            "SELECT {INSTANCE_COLUMNS} FROM class_instances WHERE subject_id = ? AND class_date = ? AND start_time = ?"
        );
        let instance = sqlx::query_as::<_, ClassInstance>(&query)
            .bind(&payload.subject_id)
            .bind(payload.class_date)
            .bind(payload.start_time)
            .fetch_one(&self.pool)
            .await?;

        Ok((instance, res.rows_affected() > 0))
    }

    pub async fn list_instances(&self, query: ClassInstanceQuery) -> Result<Vec<ClassInstance>> {
        let mut filters = Vec::new();
        if query.subject_id.is_some() {
            filters.push("subject_id = ?");
        }
        if query.status.is_some() {
            filters.push("status = ?");
        }
        if query.from.is_some() {
            filters.push("class_date >= ?");
        }
        if query.to.is_some() {
            filters.push("class_date <= ?");
        }
        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT {INSTANCE_COLUMNS} FROM class_instances {} ORDER BY class_date ASC, start_time ASC",
            where_clause
        );
        let mut statement = sqlx::query_as::<_, ClassInstance>(&sql);
        if let Some(subject_id) = query.subject_id {
            statement = statement.bind(subject_id);
        }
        if let Some(status) = query.status {
            statement = statement.bind(status);
        }
        if let Some(from) = query.from {
            statement = statement.bind(from);
        }
        if let Some(to) = query.to {
            statement = statement.bind(to);
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    /// Setting a mark back to `unmarked` clears its reason and timestamp.
    pub async fn mark(&self, id: &str, payload: MarkAttendancePayload) -> Result<ClassInstance> {
        let (reason_code, marked_at) = match payload.status {
            AttendanceStatus::Unmarked => (None, None),
            _ => (payload.reason_code, Some(now())),
        };

        let query = format!(
            "UPDATE class_instances SET status = ?, reason_code = ?, marked_at = ? WHERE id = ? RETURNING {INSTANCE_COLUMNS}"
        );
        let instance = sqlx::query_as::<_, ClassInstance>(&query)
            .bind(payload.status)
            .bind(reason_code)
            .bind(marked_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Class instance {} not found", id)))?;

        info!(instance_id = %id, status = %instance.status, "Attendance marked");
        Ok(instance)
    }

    async fn tallies(&self, subject_id: Option<&str>) -> Result<HashMap<String, AttendanceTally>> {
        let rows: Vec<(String, AttendanceStatus, i64)> = match subject_id {
            Some(subject_id) => {
                sqlx::query_as(
                    "SELECT subject_id, status, COUNT(*) FROM class_instances WHERE subject_id = ? GROUP BY subject_id, status",
                )
                .bind(subject_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT subject_id, status, COUNT(*) FROM class_instances GROUP BY subject_id, status",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut tallies: HashMap<String, AttendanceTally> = HashMap::new();
        for (subject_id, status, count) in rows {
            tallies.entry(subject_id).or_default().record(status, count);
        }
        Ok(tallies)
    }

    pub async fn subject_stats(&self, subject: Subject) -> Result<SubjectAttendanceResponse> {
        let tally = self
            .tallies(Some(&subject.id))
            .await?
            .remove(&subject.id)
            .unwrap_or_default();
        let stats = self.policy.evaluate(&tally)?;
        Ok(SubjectAttendanceResponse::new(subject, stats))
    }

    /// Every subject's stats plus a combined figure, riskiest subjects first.
    pub async fn overview(&self, subjects: Vec<Subject>) -> Result<AttendanceOverviewResponse> {
        let mut tallies = self.tallies(None).await?;
        let mut overall = AttendanceTally::default();
        let mut rows = Vec::with_capacity(subjects.len());

        for subject in subjects {
            let tally = tallies.remove(&subject.id).unwrap_or_default();
            overall.present += tally.present;
            overall.absent += tally.absent;
            overall.excused += tally.excused;
            overall.cancelled += tally.cancelled;
            overall.unmarked += tally.unmarked;
            let stats = self.policy.evaluate(&tally)?;
            rows.push(SubjectAttendanceResponse::new(subject, stats));
        }

        rows.sort_by(|a, b| {
            a.stats
                .risk
                .cmp(&b.stats.risk)
                .then_with(|| a.stats.percentage.cmp(&b.stats.percentage))
                .then_with(|| a.subject_code.cmp(&b.subject_code))
        });

        let at_risk = rows
            .iter()
            .filter(|row| row.stats.risk != RiskState::Safe)
            .count();

        Ok(AttendanceOverviewResponse {
            threshold: self.policy.threshold(),
            overall: self.policy.evaluate(&overall)?,
            at_risk,
            subjects: rows,
        })
    }
}
