mod common;

use axum::http::StatusCode;
use common::{id_of, spawn_app, TestApp};
use serde_json::json;

async fn create_project(app: &TestApp, name: &str) -> String {
    let (status, project) = app.post("/api/projects", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "{project}");
    id_of(&project)
}

async fn create_hackathon(app: &TestApp, name: &str) -> String {
    let (status, hackathon) = app.post("/api/hackathons", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "{hackathon}");
    id_of(&hackathon)
}

#[tokio::test]
async fn task_with_two_contexts_is_rejected_without_writes() {
    let app = spawn_app().await;
    let project_id = create_project(&app, "Console").await;
    let hackathon_id = create_hackathon(&app, "Build Week").await;

    let (status, body) = app
        .post(
            "/api/tasks",
            json!({
                "title": "Write pitch",
                "project_id": project_id,
                "hackathon_id": hackathon_id,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
    assert_eq!(app.count("tasks").await, 0);
    assert_eq!(app.count("task_events").await, 0);
}

#[tokio::test]
async fn task_with_unknown_project_is_not_found() {
    let app = spawn_app().await;
    let (status, _) = app
        .post(
            "/api/tasks",
            json!({ "title": "Orphan", "project_id": "missing" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.count("tasks").await, 0);
}

#[tokio::test]
async fn completing_a_task_stamps_and_clears_completion() {
    let app = spawn_app().await;
    let (status, task) = app.post("/api/tasks", json!({ "title": "Ship it" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "todo");
    assert!(task["completed_at"].is_null());
    let task_id = id_of(&task);

    let (status, done) = app
        .post(&format!("/api/tasks/{}/status", task_id), json!({ "status": "done" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "done");
    assert!(done["completed_at"].is_string());

    let (_, reopened) = app
        .post(
            &format!("/api/tasks/{}/status", task_id),
            json!({ "status": "in_progress" }),
        )
        .await;
    assert!(reopened["completed_at"].is_null());

    let (status, history) = app.get(&format!("/api/tasks/{}/history", task_id)).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = history
        .as_array()
        .expect("array")
        .iter()
        .map(|event| event["action"].as_str().expect("action"))
        .collect();
    assert_eq!(actions, vec!["created", "status_changed", "status_changed"]);
    assert_eq!(history[1]["changes"]["from"], "todo");
    assert_eq!(history[1]["changes"]["to"], "done");
}

#[tokio::test]
async fn moving_a_task_to_a_hackathon_replaces_its_project() {
    let app = spawn_app().await;
    let project_id = create_project(&app, "Console").await;
    let hackathon_id = create_hackathon(&app, "Build Week").await;
    let (_, task) = app
        .post(
            "/api/tasks",
            json!({ "title": "Demo video", "project_id": project_id }),
        )
        .await;
    let uri = format!("/api/tasks/{}", id_of(&task));

    let (status, moved) = app
        .patch(&uri, json!({ "hackathon_id": hackathon_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["hackathon_id"], hackathon_id.as_str());
    assert!(moved["project_id"].is_null());

    let (_, detached) = app.patch(&uri, json!({ "detach": true })).await;
    assert!(detached["project_id"].is_null());
    assert!(detached["hackathon_id"].is_null());

    let (status, _) = app
        .patch(&uri, json!({ "detach": true, "project_id": project_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn task_list_filters_by_status_and_context() {
    let app = spawn_app().await;
    let project_id = create_project(&app, "Console").await;
    app.post(
        "/api/tasks",
        json!({ "title": "One", "project_id": project_id, "status": "blocked" }),
    )
    .await;
    app.post("/api/tasks", json!({ "title": "Two" })).await;

    let (_, in_project) = app
        .get(&format!("/api/tasks?project_id={}", project_id))
        .await;
    assert_eq!(in_project.as_array().map(Vec::len), Some(1));

    let (_, blocked) = app.get("/api/tasks?status=blocked").await;
    assert_eq!(blocked[0]["title"], "One");
}

#[tokio::test]
async fn batch_save_creates_project_tasks_and_notes_together() {
    let app = spawn_app().await;
    let (_, existing_note) = app
        .post("/api/notes", json!({ "title": "Ideas", "content": "dark mode" }))
        .await;

    let (status, batch) = app
        .post(
            "/api/projects/save",
            json!({
                "project": { "name": "Portfolio", "priority": "high" },
                "tasks": [
                    { "title": "Landing page" },
                    { "title": "Deploy", "status": "in_progress" },
                ],
                "new_notes": [{ "title": "Hosting options" }],
                "link_note_ids": [id_of(&existing_note)],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{batch}");
    assert_eq!(batch["created"], true);
    let project_id = batch["project"]["id"].as_str().expect("project id").to_string();
    assert_eq!(batch["tasks"].as_array().map(Vec::len), Some(2));
    assert!(batch["tasks"]
        .as_array()
        .expect("tasks")
        .iter()
        .all(|task| task["project_id"] == project_id.as_str()));
    assert_eq!(batch["notes"].as_array().map(Vec::len), Some(1));
    assert_eq!(batch["links"].as_array().map(Vec::len), Some(2));

    let (status, detail) = app.get(&format!("/api/projects/{}", project_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["tasks"].as_array().map(Vec::len), Some(2));
    assert_eq!(detail["notes"].as_array().map(Vec::len), Some(2));

    let (status, updated) = app
        .post(
            "/api/projects/save",
            json!({
                "project_id": project_id,
                "project": { "status": "active" },
                "tasks": [{ "title": "Analytics" }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["created"], false);
    assert_eq!(updated["project"]["name"], "Portfolio");
    assert_eq!(app.count("tasks").await, 3);
}

#[tokio::test]
async fn batch_with_hackathon_task_is_rejected_before_writing() {
    let app = spawn_app().await;
    let hackathon_id = create_hackathon(&app, "Build Week").await;

    let (status, _) = app
        .post(
            "/api/projects/save",
            json!({
                "project": { "name": "Sneaky" },
                "tasks": [{ "title": "Both", "hackathon_id": hackathon_id }],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.count("projects").await, 0);
    assert_eq!(app.count("tasks").await, 0);
}

#[tokio::test]
async fn batch_with_missing_note_rolls_back_everything() {
    let app = spawn_app().await;

    let (status, _) = app
        .post(
            "/api/projects/save",
            json!({
                "project": { "name": "Doomed" },
                "tasks": [{ "title": "Never saved" }],
                "new_notes": [{ "title": "Also never saved" }],
                "link_note_ids": ["no-such-note"],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.count("projects").await, 0);
    assert_eq!(app.count("tasks").await, 0);
    assert_eq!(app.count("notes").await, 0);
    assert_eq!(app.count("project_events").await, 0);
}

#[tokio::test]
async fn note_links_need_exactly_one_target() {
    let app = spawn_app().await;
    let project_id = create_project(&app, "Console").await;
    let hackathon_id = create_hackathon(&app, "Build Week").await;
    let (_, note) = app.post("/api/notes", json!({ "title": "Scratch" })).await;
    let links_uri = format!("/api/notes/{}/links", id_of(&note));

    let (status, _) = app
        .post(
            &links_uri,
            json!({ "project_id": project_id, "hackathon_id": hackathon_id }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.post(&links_uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, link) = app
        .post(&links_uri, json!({ "hackathon_id": hackathon_id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, filtered) = app
        .get(&format!("/api/notes?hackathon_id={}", hackathon_id))
        .await;
    assert_eq!(filtered.as_array().map(Vec::len), Some(1));

    let link_uri = format!("{}/{}", links_uri, id_of(&link));
    let (status, _) = app.delete(&link_uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("note_links").await, 0);
    assert_eq!(app.count("notes").await, 1);

    let (status, _) = app.delete(&link_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leaving_wishlist_stamps_the_application_date() {
    let app = spawn_app().await;
    let (status, application) = app
        .post(
            "/api/applications",
            json!({ "company": "Acme", "role": "Backend Intern" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{application}");
    assert_eq!(application["stage"], "wishlist");
    assert!(application["applied_on"].is_null());

    let (status, applied) = app
        .post(
            &format!("/api/applications/{}/stage", id_of(&application)),
            json!({ "stage": "applied" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(applied["applied_on"].is_string());
}
