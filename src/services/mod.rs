pub mod application_service;
pub mod attendance_risk;
pub mod attendance_service;
pub mod audit_service;
pub mod calendar_aggregator;
pub mod calendar_service;
pub mod dashboard_service;
pub mod export_service;
pub mod hackathon_service;
pub mod import_service;
pub mod note_service;
pub mod project_service;
pub mod subject_service;
pub mod task_service;
