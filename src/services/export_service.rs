use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_xlsxwriter::*;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::dto::attendance_dto::{AttendanceOverviewResponse, SubjectAttendanceResponse};
use crate::error::Result;
use crate::models::application::Application;
use crate::models::audit_event::{AuditEntity, AuditEvent};
use crate::models::calendar_event::CalendarEvent;
use crate::models::class_instance::ClassInstance;
use crate::models::faculty::Faculty;
use crate::models::hackathon::Hackathon;
use crate::models::note::{Note, NoteLink};
use crate::models::project::Project;
use crate::models::subject::Subject;
use crate::models::task::Task;
use crate::models::timetable::TimetableSlot;
use crate::services::attendance_risk::{RiskState, SubjectAttendanceStats};
use crate::services::audit_service::AuditService;
use crate::utils::time::{new_id, now};

/// Every stored row, grouped by table.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDump {
    pub exported_at: DateTime<Utc>,
    pub faculty: Vec<Faculty>,
    pub subjects: Vec<Subject>,
    pub timetable_slots: Vec<TimetableSlot>,
    pub class_instances: Vec<ClassInstance>,
    pub hackathons: Vec<Hackathon>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub note_links: Vec<NoteLink>,
    pub calendar_events: Vec<CalendarEvent>,
    pub applications: Vec<Application>,
    pub task_events: Vec<AuditEvent>,
    pub project_events: Vec<AuditEvent>,
    pub hackathon_events: Vec<AuditEvent>,
}

#[derive(Clone)]
pub struct ExportService {
    pool: SqlitePool,
}

impl ExportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn all<T>(&self, sql: &str) -> Result<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        Ok(sqlx::query_as::<_, T>(sql).fetch_all(&self.pool).await?)
    }

    pub async fn dump(&self) -> Result<ExportDump> {
        let audit = AuditService::new(self.pool.clone());
        let dump = ExportDump {
            exported_at: now(),
            faculty: self.all("SELECT * FROM faculty ORDER BY created_at, rowid").await?,
            subjects: self.all("SELECT * FROM subjects ORDER BY code").await?,
            timetable_slots: self
                .all("SELECT * FROM timetable_slots ORDER BY weekday, start_time")
                .await?,
            class_instances: self
                .all("SELECT * FROM class_instances ORDER BY class_date, start_time")
                .await?,
            hackathons: self.all("SELECT * FROM hackathons ORDER BY created_at, rowid").await?,
            projects: self.all("SELECT * FROM projects ORDER BY created_at, rowid").await?,
            tasks: self.all("SELECT * FROM tasks ORDER BY created_at, rowid").await?,
            notes: self.all("SELECT * FROM notes ORDER BY created_at, rowid").await?,
            note_links: self.all("SELECT * FROM note_links ORDER BY created_at, rowid").await?,
            calendar_events: self
                .all("SELECT * FROM calendar_events ORDER BY event_date, rowid")
                .await?,
            applications: self
                .all("SELECT * FROM applications ORDER BY created_at, rowid")
                .await?,
            task_events: audit.list_all(AuditEntity::Task).await?,
            project_events: audit.list_all(AuditEntity::Project).await?,
            hackathon_events: audit.list_all(AuditEntity::Hackathon).await?,
        };

        info!(
            tasks = dump.tasks.len(),
            projects = dump.projects.len(),
            hackathons = dump.hackathons.len(),
            "JSON export generated"
        );
        Ok(dump)
    }

    /// Writes a consistent copy of the live database with `VACUUM INTO` and
    /// hands back an open handle to it. The copy's path is unlinked on every
    /// branch, so nothing is left behind once the handle drops.
    pub async fn snapshot_database(&self) -> Result<tokio::fs::File> {
        let path: PathBuf = std::env::temp_dir().join(format!("console-snapshot-{}.db", new_id()));
        let target = path.to_string_lossy().to_string();

        let vacuum = sqlx::query("VACUUM INTO ?")
            .bind(&target)
            .execute(&self.pool)
            .await;
        if let Err(e) = vacuum {
            discard_snapshot(&path).await;
            return Err(e.into());
        }

        let file = open_detached(&path).await?;
        info!("Database snapshot written");
        Ok(file)
    }

    /// Styled XLSX workbook with one row per subject and a totals row.
    pub fn attendance_xlsx(overview: &AttendanceOverviewResponse) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Attendance")?;

        let primary_color = Color::RGB(0x1E293B);
        let header_bg = Color::RGB(0x0F172A);
        let header_text = Color::White;
        let alt_row_1 = Color::RGB(0xF8FAFC);
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0);

        let columns = [
            ("Code", 12.0),
            ("Subject", 32.0),
            ("Type", 10.0),
            ("Present", 10.0),
            ("Absent", 10.0),
            ("Excused", 10.0),
            ("Cancelled", 11.0),
            ("Unmarked", 11.0),
            ("Attended / Total", 16.0),
            ("Percentage", 12.0),
            ("Risk", 14.0),
            ("Classes needed", 15.0),
            ("Can skip", 11.0),
        ];
        let last_col = (columns.len() - 1) as u16;

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(header_text)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 40)?;
        worksheet.merge_range(0, 0, 0, last_col, "Attendance report", &title_format)?;

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(1, 22)?;
        let subtitle = format!(
            "Exported {}  •  Threshold {}%  •  {} of {} subjects below threshold",
            now().format("%Y-%m-%d %H:%M UTC"),
            overview.threshold,
            overview.at_risk,
            overview.subjects.len()
        );
        worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(header_text)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 2;
        worksheet.set_row_height(header_row, 30)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        let data_start_row = 3;
        for (idx, subject) in overview.subjects.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };
            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.set_row_height(row, 22)?;
            write_subject_row(worksheet, row, subject, &base_fmt, border_color)?;
        }

        let total_row = data_start_row + overview.subjects.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        worksheet.set_row_height(total_row, 26)?;
        worksheet.merge_range(total_row, 0, total_row, 2, "Overall", &summary_fmt)?;
        write_stats(worksheet, total_row, &overview.overall, &summary_fmt, border_color)?;

        worksheet.set_freeze_panes(3, 0)?;
        if !overview.subjects.is_empty() {
            worksheet.autofilter(
                header_row,
                0,
                data_start_row + overview.subjects.len() as u32 - 1,
                last_col,
            )?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn write_subject_row(
    worksheet: &mut Worksheet,
    row: u32,
    subject: &SubjectAttendanceResponse,
    base_fmt: &Format,
    border_color: Color,
) -> Result<()> {
    let bold_fmt = base_fmt.clone().set_bold();
    let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);

    worksheet.write_string_with_format(row, 0, &subject.subject_code, &bold_fmt)?;
    worksheet.write_string_with_format(row, 1, &subject.subject_name, base_fmt)?;
    worksheet.write_string_with_format(row, 2, subject.subject_type.as_str(), &center_fmt)?;
    write_stats(worksheet, row, &subject.stats, &center_fmt, border_color)
}

fn write_stats(
    worksheet: &mut Worksheet,
    row: u32,
    stats: &SubjectAttendanceStats,
    fmt: &Format,
    border_color: Color,
) -> Result<()> {
    let counts = [
        stats.tally.present,
        stats.tally.absent,
        stats.tally.excused,
        stats.tally.cancelled,
        stats.tally.unmarked,
    ];
    for (offset, count) in counts.iter().enumerate() {
        worksheet.write_number_with_format(row, 3 + offset as u16, *count as f64, fmt)?;
    }
    worksheet.write_string_with_format(
        row,
        8,
        &format!("{} / {}", stats.attended, stats.total),
        fmt,
    )?;
    worksheet.write_number_with_format(row, 9, stats.percentage as f64, fmt)?;

    let (risk_color, risk_label) = match stats.risk {
        RiskState::Safe => (Color::RGB(0x10B981), "Safe"),
        RiskState::Borderline => (Color::RGB(0xF59E0B), "Borderline"),
        RiskState::Critical => (Color::RGB(0xEF4444), "Critical"),
    };
    let risk_fmt = Format::new()
        .set_font_size(10)
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(risk_color)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(border_color);
    worksheet.write_string_with_format(row, 10, risk_label, &risk_fmt)?;
    worksheet.write_number_with_format(row, 11, stats.classes_needed as f64, fmt)?;
    worksheet.write_number_with_format(row, 12, stats.classes_can_skip as f64, fmt)?;
    Ok(())
}

/// Opens the snapshot and unlinks its path whether or not the open succeeded.
async fn open_detached(path: &Path) -> Result<tokio::fs::File> {
    let opened = tokio::fs::File::open(path).await;
    discard_snapshot(path).await;
    Ok(opened?)
}

async fn discard_snapshot(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Could not unlink database snapshot"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_path_is_unlinked_after_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.db");
        tokio::fs::write(&path, b"SQLite format 3\0").await.unwrap();

        let file = open_detached(&path).await;
        assert!(file.is_ok());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failed_open_still_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");

        assert!(open_detached(&path).await.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
