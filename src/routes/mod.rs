pub mod applications;
pub mod attendance;
pub mod calendar;
pub mod dashboard;
pub mod export;
pub mod hackathons;
pub mod health;
pub mod import;
pub mod notes;
pub mod openapi;
pub mod projects;
pub mod subjects;
pub mod tasks;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::{
        cors::console_cors,
        rate_limit::{limit_requests, RequestBudget},
    },
    AppState,
};

/// Largest accepted request body; legacy imports are the biggest payloads.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState, config: &Config) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi::openapi_json));

    let academic_api = Router::new()
        .route(
            "/api/faculty",
            get(subjects::list_faculty).post(subjects::create_faculty),
        )
        .route(
            "/api/faculty/:id",
            get(subjects::get_faculty)
                .patch(subjects::update_faculty)
                .delete(subjects::delete_faculty),
        )
        .route(
            "/api/subjects",
            get(subjects::list_subjects).post(subjects::create_subject),
        )
        .route(
            "/api/subjects/:id",
            get(subjects::get_subject)
                .patch(subjects::update_subject)
                .delete(subjects::delete_subject),
        )
        .route(
            "/api/timetable",
            get(attendance::list_slots).post(attendance::create_slot),
        )
        .route("/api/timetable/generate", post(attendance::generate_instances))
        .route("/api/timetable/:id", delete(attendance::delete_slot))
        .route(
            "/api/class-instances",
            get(attendance::list_instances).post(attendance::create_instance),
        )
        .route(
            "/api/class-instances/:id/attendance",
            patch(attendance::mark_attendance),
        )
        .route("/api/attendance", get(attendance::attendance_overview))
        .route(
            "/api/attendance/:subject_id",
            get(attendance::subject_attendance),
        );

    let tracker_api = Router::new()
        .route(
            "/api/hackathons",
            get(hackathons::list_hackathons).post(hackathons::create_hackathon),
        )
        .route(
            "/api/hackathons/:id",
            get(hackathons::get_hackathon)
                .patch(hackathons::update_hackathon)
                .delete(hackathons::delete_hackathon),
        )
        .route(
            "/api/hackathons/:id/status",
            post(hackathons::set_hackathon_status),
        )
        .route(
            "/api/hackathons/:id/history",
            get(hackathons::hackathon_history),
        )
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/api/projects/save", post(projects::save_project_batch))
        .route(
            "/api/projects/:id",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/api/projects/:id/status",
            post(projects::set_project_status),
        )
        .route("/api/projects/:id/history", get(projects::project_history))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/:id",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/tasks/:id/status", post(tasks::set_task_status))
        .route("/api/tasks/:id/history", get(tasks::task_history))
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/api/notes/:id",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/api/notes/:id/links", post(notes::link_note))
        .route(
            "/api/notes/:id/links/:link_id",
            delete(notes::unlink_note),
        )
        .route(
            "/api/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_application)
                .patch(applications::update_application)
                .delete(applications::delete_application),
        )
        .route(
            "/api/applications/:id/stage",
            post(applications::set_application_stage),
        );

    let calendar_api = Router::new()
        .route("/api/calendar", get(calendar::month_view))
        .route("/api/calendar/upcoming", get(calendar::upcoming))
        .route(
            "/api/calendar/events",
            get(calendar::list_events).post(calendar::create_event),
        )
        .route(
            "/api/calendar/events/:id",
            get(calendar::get_event)
                .patch(calendar::update_event)
                .delete(calendar::delete_event),
        )
        .route("/api/dashboard", get(dashboard::dashboard));

    let data_api = Router::new()
        .route("/api/export", get(export::export_json))
        .route("/api/export/database", get(export::export_database))
        .route("/api/export/attendance", get(export::export_attendance))
        .route("/api/import/legacy", post(import::import_legacy));

    let budget = RequestBudget::new(config.api_rps);
    let api = academic_api
        .merge(tracker_api)
        .merge(calendar_api)
        .merge(data_api)
        .layer(axum::middleware::from_fn_with_state(budget, limit_requests));

    base_routes
        .merge(api)
        .with_state(state)
        .layer(console_cors())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
