pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    application_service::ApplicationService, attendance_service::AttendanceService,
    audit_service::AuditService, calendar_service::CalendarService,
    dashboard_service::DashboardService, export_service::ExportService,
    hackathon_service::HackathonService, import_service::ImportService,
    note_service::NoteService, project_service::ProjectService, subject_service::SubjectService,
    task_service::TaskService,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub subject_service: SubjectService,
    pub attendance_service: AttendanceService,
    pub hackathon_service: HackathonService,
    pub project_service: ProjectService,
    pub task_service: TaskService,
    pub note_service: NoteService,
    pub calendar_service: CalendarService,
    pub application_service: ApplicationService,
    pub audit_service: AuditService,
    pub dashboard_service: DashboardService,
    pub export_service: ExportService,
    pub import_service: ImportService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        let subject_service = SubjectService::new(pool.clone());
        let attendance_service = AttendanceService::new(pool.clone(), config.attendance);
        let hackathon_service = HackathonService::new(pool.clone());
        let project_service = ProjectService::new(pool.clone());
        let task_service = TaskService::new(pool.clone());
        let note_service = NoteService::new(pool.clone());
        let calendar_service =
            CalendarService::new(pool.clone(), config.urgency, config.upcoming_limit);
        let application_service = ApplicationService::new(pool.clone());
        let audit_service = AuditService::new(pool.clone());
        let dashboard_service = DashboardService::new(
            subject_service.clone(),
            attendance_service.clone(),
            calendar_service.clone(),
            task_service.clone(),
            application_service.clone(),
            hackathon_service.clone(),
        );
        let export_service = ExportService::new(pool.clone());
        let import_service = ImportService::new(pool.clone());

        Self {
            pool,
            config: Arc::new(config.clone()),
            subject_service,
            attendance_service,
            hackathon_service,
            project_service,
            task_service,
            note_service,
            calendar_service,
            application_service,
            audit_service,
            dashboard_service,
            export_service,
            import_service,
        }
    }
}
