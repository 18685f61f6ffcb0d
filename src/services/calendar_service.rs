use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::dto::calendar_dto::{
    CalendarViewResponse, CreateCalendarEventPayload, UpcomingResponse,
    UpdateCalendarEventPayload,
};
use crate::error::{Error, Result};
use crate::models::calendar_event::{CalendarEvent, EventType};
use crate::models::hackathon::Hackathon;
use crate::models::project::Project;
use crate::services::calendar_aggregator::{
    self, AnnotatedItem, CalendarItem, DeadlineSources, UrgencyPolicy,
};
use crate::services::hackathon_service::HACKATHON_COLUMNS;
use crate::services::project_service::PROJECT_COLUMNS;
use crate::utils::time::{month_bounds, new_id, now};

const EVENT_COLUMNS: &str = "id, title, description, event_date, event_time, event_type, priority, hackathon_id, project_id, created_at, updated_at";

/// Largest page the upcoming view will return regardless of the request.
const MAX_UPCOMING_LIMIT: usize = 100;

/// Read-only snapshot the aggregator runs over.
pub struct CalendarSnapshot {
    pub events: Vec<CalendarEvent>,
    pub hackathons: Vec<Hackathon>,
    pub projects: Vec<Project>,
}

impl CalendarSnapshot {
    pub fn items(&self) -> Vec<CalendarItem> {
        calendar_aggregator::aggregate(&DeadlineSources {
            events: &self.events,
            hackathons: &self.hackathons,
            projects: &self.projects,
        })
    }
}

#[derive(Clone)]
pub struct CalendarService {
    pool: SqlitePool,
    urgency: UrgencyPolicy,
    upcoming_limit: usize,
}

impl CalendarService {
    pub fn new(pool: SqlitePool, urgency: UrgencyPolicy, upcoming_limit: usize) -> Self {
        Self {
            pool,
            urgency,
            upcoming_limit,
        }
    }

    pub async fn snapshot(&self) -> Result<CalendarSnapshot> {
        let events = self.list_events().await?;
        let hackathons = sqlx::query_as::<_, Hackathon>(&format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons"
        ))
        .fetch_all(&self.pool)
        .await?;
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(CalendarSnapshot {
            events,
            hackathons,
            projects,
        })
    }

    /// Every item dated inside the month, closed sources included.
    pub async fn month(&self, year: i32, month: u32, today: NaiveDate) -> Result<CalendarViewResponse> {
        let (from, to) = month_bounds(year, month)?;
        let items = calendar_aggregator::within(self.snapshot().await?.items(), from, to);
        Ok(CalendarViewResponse {
            from,
            to,
            today,
            items: calendar_aggregator::annotate(items, today, &self.urgency),
        })
    }

    pub async fn upcoming(&self, limit: Option<usize>, today: NaiveDate) -> Result<UpcomingResponse> {
        let items = self.upcoming_items(limit, today).await?;
        Ok(UpcomingResponse { today, items })
    }

    pub async fn upcoming_items(
        &self,
        limit: Option<usize>,
        today: NaiveDate,
    ) -> Result<Vec<AnnotatedItem>> {
        let limit = limit
            .unwrap_or(self.upcoming_limit)
            .clamp(1, MAX_UPCOMING_LIMIT);
        let items = calendar_aggregator::upcoming(self.snapshot().await?.items(), today, limit);
        Ok(calendar_aggregator::annotate(items, today, &self.urgency))
    }

    pub async fn create_event(&self, payload: CreateCalendarEventPayload) -> Result<CalendarEvent> {
        self.ensure_reference(
            "hackathons",
            "Hackathon",
            payload.hackathon_id.as_deref(),
        )
        .await?;
        self.ensure_reference("projects", "Project", payload.project_id.as_deref())
            .await?;

        let inferred_type = match (&payload.hackathon_id, &payload.project_id) {
            (Some(_), _) => EventType::Hackathon,
            (None, Some(_)) => EventType::Project,
            (None, None) => EventType::Personal,
        };
        let event_type = payload.event_type.unwrap_or(inferred_type);

        let timestamp = now();
        let query = format!(
            "INSERT INTO calendar_events ({EVENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(new_id())
            .bind(payload.title.trim())
            .bind(payload.description)
            .bind(payload.event_date)
            .bind(payload.event_time)
            .bind(event_type)
            .bind(payload.priority)
            .bind(payload.hackathon_id)
            .bind(payload.project_id)
            .bind(timestamp)
            .bind(timestamp)
            .fetch_one(&self.pool)
            .await?;

        info!(event_id = %event.id, date = %event.event_date, "Calendar event created");
        Ok(event)
    }

    pub async fn update_event(
        &self,
        id: &str,
        payload: UpdateCalendarEventPayload,
    ) -> Result<CalendarEvent> {
        ensure_manual(id)?;
        let query = format!(
            r#"
            UPDATE calendar_events
            SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                event_date = COALESCE(?, event_date),
                event_time = COALESCE(?, event_time),
                event_type = COALESCE(?, event_type),
                priority = COALESCE(?, priority),
                updated_at = ?
            WHERE id = ?
            RETURNING {EVENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(payload.title.map(|title| title.trim().to_string()))
            .bind(payload.description)
            .bind(payload.event_date)
            .bind(payload.event_time)
            .bind(payload.event_type)
            .bind(payload.priority)
            .bind(now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Calendar event {} not found", id)))
    }

    pub async fn get_event(&self, id: &str) -> Result<CalendarEvent> {
        ensure_manual(id)?;
        let sql = format!("SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = ?");
        sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Calendar event {} not found", id)))
    }

    pub async fn list_events(&self) -> Result<Vec<CalendarEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events ORDER BY event_date ASC, event_time ASC"
        );
        Ok(sqlx::query_as::<_, CalendarEvent>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Only manual events are rows; deadline entries change through their source.
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        ensure_manual(id)?;
        let res = sqlx::query("DELETE FROM calendar_events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Calendar event {} not found", id)));
        }
        info!(event_id = %id, "Calendar event deleted");
        Ok(())
    }

    async fn ensure_reference(&self, table: &str, label: &str, id: Option<&str>) -> Result<()> {
        let Some(id) = id else {
            return Ok(());
        };
        let sql = format!("SELECT id FROM {} WHERE id = ?", table);
        let found: Option<String> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Err(Error::NotFound(format!("{} {} not found", label, id)));
        }
        Ok(())
    }
}

fn ensure_manual(id: &str) -> Result<()> {
    if calendar_aggregator::is_derived_id(id) {
        return Err(Error::InvariantViolation(format!(
            "{} is derived from a hackathon or project deadline; edit the source instead",
            id
        )));
    }
    Ok(())
}
