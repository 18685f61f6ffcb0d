use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use super::{
    applications, attendance, calendar, dashboard, export, hackathons, health, import, notes,
    projects, subjects, tasks,
};
use crate::dto::{
    application_dto::{ApplicationStagePayload, CreateApplicationPayload, UpdateApplicationPayload},
    attendance_dto::{
        CreateClassInstancePayload, CreateSlotPayload, GenerateInstancesPayload,
        MarkAttendancePayload,
    },
    calendar_dto::{CreateCalendarEventPayload, UpdateCalendarEventPayload},
    hackathon_dto::{CreateHackathonPayload, HackathonStatusPayload, UpdateHackathonPayload},
    import_dto::LegacyImportPayload,
    note_dto::{CreateNotePayload, LinkNotePayload, UpdateNotePayload},
    project_dto::{
        CreateProjectPayload, ProjectBatchPayload, ProjectStatusPayload, StagedTaskPayload,
        UpdateProjectPayload,
    },
    subject_dto::{
        CreateFacultyPayload, CreateSubjectPayload, UpdateFacultyPayload, UpdateSubjectPayload,
    },
    task_dto::{CreateTaskPayload, TaskStatusPayload, UpdateTaskPayload},
};
use crate::models::{
    application::{ApplicationKind, ApplicationStage},
    calendar_event::EventType,
    class_instance::AttendanceStatus,
    hackathon::HackathonStatus,
    priority::Priority,
    project::ProjectStatus,
    subject::SubjectType,
    task::TaskStatus,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Command Console API", description = "Attendance, deadlines and project tracking"),
    paths(
        health::health,
        subjects::list_faculty,
        subjects::create_faculty,
        subjects::get_faculty,
        subjects::update_faculty,
        subjects::delete_faculty,
        subjects::list_subjects,
        subjects::create_subject,
        subjects::get_subject,
        subjects::update_subject,
        subjects::delete_subject,
        attendance::list_slots,
        attendance::create_slot,
        attendance::delete_slot,
        attendance::generate_instances,
        attendance::list_instances,
        attendance::create_instance,
        attendance::mark_attendance,
        attendance::attendance_overview,
        attendance::subject_attendance,
        hackathons::list_hackathons,
        hackathons::create_hackathon,
        hackathons::get_hackathon,
        hackathons::update_hackathon,
        hackathons::set_hackathon_status,
        hackathons::hackathon_history,
        hackathons::delete_hackathon,
        projects::list_projects,
        projects::create_project,
        projects::get_project,
        projects::update_project,
        projects::set_project_status,
        projects::project_history,
        projects::save_project_batch,
        projects::delete_project,
        tasks::list_tasks,
        tasks::create_task,
        tasks::get_task,
        tasks::update_task,
        tasks::set_task_status,
        tasks::task_history,
        tasks::delete_task,
        notes::list_notes,
        notes::create_note,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        notes::link_note,
        notes::unlink_note,
        calendar::month_view,
        calendar::upcoming,
        calendar::list_events,
        calendar::create_event,
        calendar::get_event,
        calendar::update_event,
        calendar::delete_event,
        applications::list_applications,
        applications::create_application,
        applications::get_application,
        applications::update_application,
        applications::set_application_stage,
        applications::delete_application,
        dashboard::dashboard,
        export::export_json,
        export::export_database,
        export::export_attendance,
        import::import_legacy,
    ),
    components(schemas(
        CreateFacultyPayload,
        UpdateFacultyPayload,
        CreateSubjectPayload,
        UpdateSubjectPayload,
        CreateSlotPayload,
        GenerateInstancesPayload,
        CreateClassInstancePayload,
        MarkAttendancePayload,
        CreateHackathonPayload,
        UpdateHackathonPayload,
        HackathonStatusPayload,
        CreateProjectPayload,
        UpdateProjectPayload,
        ProjectStatusPayload,
        StagedTaskPayload,
        ProjectBatchPayload,
        CreateTaskPayload,
        UpdateTaskPayload,
        TaskStatusPayload,
        CreateNotePayload,
        UpdateNotePayload,
        LinkNotePayload,
        CreateCalendarEventPayload,
        UpdateCalendarEventPayload,
        CreateApplicationPayload,
        UpdateApplicationPayload,
        ApplicationStagePayload,
        LegacyImportPayload,
        Priority,
        SubjectType,
        AttendanceStatus,
        HackathonStatus,
        ProjectStatus,
        TaskStatus,
        EventType,
        ApplicationKind,
        ApplicationStage,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
