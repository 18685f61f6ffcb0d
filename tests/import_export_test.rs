mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use serde_json::{json, Value as JsonValue};

fn legacy_payload() -> JsonValue {
    json!({
        "projects": [
            { "id": "p-1", "name": "Old Portfolio", "status": "Active", "dueDate": "2026-12-01" },
            { "id": 2, "title": "Numeric Id Project" },
            { "name": "No Id" },
        ],
        "hackathons": [
            {
                "_id": "h-1",
                "name": "Winter Hack",
                "status": "under review",
                "submissionDeadline": "2026-12-10T18:00:00Z",
            },
            { "id": "h-2", "name": "Bad Dates", "startDate": "2026-12-05", "endDate": "2026-12-01" },
        ],
        "tasks": [
            { "id": "t-1", "title": "Migrate styles", "projectId": "p-1", "status": "done" },
            { "id": "t-2", "title": "Register team", "hackathonId": "h-1" },
            { "id": "t-3", "title": "Lost", "projectId": "p-404" },
            { "id": "t-4", "title": "Greedy", "projectId": "p-1", "hackathonId": "h-1" },
            "not an object",
        ],
    })
}

#[tokio::test]
async fn legacy_import_reports_each_record_and_is_repeatable() {
    let app = spawn_app().await;

    let (status, report) = app.post("/api/import/legacy", legacy_payload()).await;
    assert_eq!(status, StatusCode::OK, "{report}");

    assert_eq!(report["projects"]["inserted"], 2);
    assert_eq!(report["projects"]["rejected"][0]["index"], 2);
    assert_eq!(report["hackathons"]["inserted"], 1);
    assert_eq!(report["hackathons"]["rejected"][0]["id"], "h-2");
    assert_eq!(report["tasks"]["inserted"], 2);
    assert_eq!(report["tasks"]["skipped_orphaned"], 1);
    assert_eq!(report["tasks"]["rejected"].as_array().map(Vec::len), Some(2));

    let (_, project) = app.get("/api/projects/p-1").await;
    assert_eq!(project["status"], "active");
    assert_eq!(project["deadline"], "2026-12-01");
    let (_, hackathon) = app.get("/api/hackathons/h-1").await;
    assert_eq!(hackathon["status"], "under_review");
    assert_eq!(hackathon["submission_deadline"], "2026-12-10");
    let (_, task) = app.get("/api/tasks/t-1").await;
    assert_eq!(task["project_id"], "p-1");

    let (status, again) = app.post("/api/import/legacy", legacy_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["projects"]["inserted"], 0);
    assert_eq!(again["projects"]["skipped_existing"], 2);
    assert_eq!(again["hackathons"]["skipped_existing"], 1);
    assert_eq!(again["tasks"]["inserted"], 0);
    assert_eq!(again["tasks"]["skipped_existing"], 2);
    assert_eq!(app.count("projects").await, 2);
    assert_eq!(app.count("tasks").await, 2);
}

#[tokio::test]
async fn json_export_contains_every_table() {
    let app = spawn_app().await;
    app.post("/api/import/legacy", legacy_payload()).await;
    app.post("/api/notes", json!({ "title": "Keep me" })).await;

    let (status, dump) = app.get("/api/export").await;
    assert_eq!(status, StatusCode::OK);
    assert!(dump["exported_at"].is_string());
    assert_eq!(dump["projects"].as_array().map(Vec::len), Some(2));
    assert_eq!(dump["tasks"].as_array().map(Vec::len), Some(2));
    assert_eq!(dump["notes"].as_array().map(Vec::len), Some(1));
    assert_eq!(dump["project_events"][0]["action"], "imported");
    for table in ["faculty", "subjects", "timetable_slots", "class_instances", "applications"] {
        assert!(dump[table].is_array(), "{table} missing from export");
    }
}

#[tokio::test]
async fn database_export_is_a_sqlite_file() {
    let app = spawn_app().await;
    app.post("/api/projects", json!({ "name": "Snapshot me" })).await;

    let (status, content_type, body) = app.raw(Method::GET, "/api/export/database").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/vnd.sqlite3"));
    assert!(body.starts_with(b"SQLite format 3\0"));
}

#[tokio::test]
async fn attendance_export_is_a_workbook() {
    let app = spawn_app().await;
    app.post("/api/subjects", json!({ "name": "Networks", "code": "CS401" }))
        .await;

    let (status, content_type, body) = app.raw(Method::GET, "/api/export/attendance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = spawn_app().await;

    let (status, health) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");

    let (status, doc) = app.get("/api/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/attendance"].is_object());
    assert!(doc["paths"]["/api/tasks/{id}"]["delete"].is_object());
    assert!(doc["paths"]["/api/notes/{id}/links/{link_id}"]["delete"].is_object());
    assert!(doc["paths"]["/api/export/database"]["get"].is_object());

    // Every request body reference resolves to a registered schema.
    let schemas = &doc["components"]["schemas"];
    for (path, item) in doc["paths"].as_object().unwrap() {
        for (method, op) in item.as_object().unwrap() {
            let reference = &op["requestBody"]["content"]["application/json"]["schema"]["$ref"];
            if let Some(reference) = reference.as_str() {
                let name = reference.trim_start_matches("#/components/schemas/");
                assert!(
                    schemas[name].is_object(),
                    "{method} {path} refers to unregistered schema {name}"
                );
            }
        }
    }
    assert!(schemas["UpdateProjectPayload"]["properties"]["deadline"].is_object());
    assert!(schemas["TaskStatus"].is_object());
}
