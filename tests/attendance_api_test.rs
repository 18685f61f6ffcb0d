mod common;

use axum::http::StatusCode;
use common::{id_of, spawn_app, TestApp};
use serde_json::json;

async fn create_subject(app: &TestApp, code: &str) -> String {
    let (status, subject) = app
        .post(
            "/api/subjects",
            json!({ "name": "Operating Systems", "code": code }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{subject}");
    id_of(&subject)
}

async fn record_marks(app: &TestApp, subject_id: &str, marks: &[&str]) {
    for (day, mark) in marks.iter().enumerate() {
        let (status, instance) = app
            .post(
                "/api/class-instances",
                json!({
                    "subject_id": subject_id,
                    "class_date": format!("2026-09-{:02}", day + 1),
                    "start_time": "09:00:00",
                    "end_time": "10:00:00",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{instance}");

        let (status, marked) = app
            .patch(
                &format!("/api/class-instances/{}/attendance", id_of(&instance)),
                json!({ "status": mark }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{marked}");
        assert_eq!(marked["status"], *mark);
    }
}

#[tokio::test]
async fn three_of_four_present_is_safe_at_seventy_five() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "CS301").await;
    record_marks(&app, &subject_id, &["present", "present", "absent", "present"]).await;

    let (status, stats) = app.get(&format!("/api/attendance/{}", subject_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["attended"], 3);
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["percentage"], 75);
    assert_eq!(stats["risk"], "SAFE");
    assert_eq!(stats["classes_needed"], 0);
    assert_eq!(stats["subject_code"], "CS301");
}

#[tokio::test]
async fn one_of_three_present_is_critical_and_needs_five() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "MA201").await;
    record_marks(&app, &subject_id, &["absent", "absent", "present"]).await;

    let (status, stats) = app.get(&format!("/api/attendance/{}", subject_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["percentage"], 33);
    assert_eq!(stats["risk"], "CRITICAL");
    assert_eq!(stats["classes_needed"], 5);

    let (status, overview) = app.get("/api/attendance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["threshold"], 75);
    assert_eq!(overview["at_risk"], 1);
    assert_eq!(overview["subjects"][0]["subject_id"], subject_id.as_str());
}

#[tokio::test]
async fn cancelled_and_unmarked_classes_do_not_count() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "PH101").await;
    record_marks(&app, &subject_id, &["present", "cancelled", "no_class", "unmarked"]).await;

    let (_, stats) = app.get(&format!("/api/attendance/{}", subject_id)).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["percentage"], 100);
    assert_eq!(stats["cancelled"], 2);
    assert_eq!(stats["unmarked"], 1);
}

#[tokio::test]
async fn subject_without_classes_reports_full_attendance() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "EE110").await;

    let (status, detail) = app.get(&format!("/api/subjects/{}", subject_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["attendance"]["percentage"], 100);
    assert_eq!(detail["attendance"]["risk"], "SAFE");
    assert_eq!(detail["attendance"]["classes_needed"], 0);
    assert!(detail["faculty"].is_null());
}

#[tokio::test]
async fn timetable_generation_is_idempotent() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "CS310").await;

    let (status, _) = app
        .post(
            "/api/timetable",
            json!({
                "subject_id": subject_id,
                "weekday": 0,
                "start_time": "11:00:00",
                "end_time": "12:30:00",
                "room": "B-204",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let range = json!({ "from": "2026-10-05", "to": "2026-10-18" });
    let (status, first) = app.post("/api/timetable/generate", range.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["created"], 2);
    assert_eq!(first["already_present"], 0);

    let (_, second) = app.post("/api/timetable/generate", range).await;
    assert_eq!(second["created"], 0);
    assert_eq!(second["already_present"], 2);
    assert_eq!(app.count("class_instances").await, 2);

    let (_, instances) = app
        .get(&format!("/api/class-instances?subject_id={}", subject_id))
        .await;
    let dates: Vec<&str> = instances
        .as_array()
        .expect("array")
        .iter()
        .map(|instance| instance["class_date"].as_str().expect("date"))
        .collect();
    assert_eq!(dates, vec!["2026-10-05", "2026-10-12"]);
}

#[tokio::test]
async fn generation_rejects_reversed_range() {
    let app = spawn_app().await;
    let (status, body) = app
        .post(
            "/api/timetable/generate",
            json!({ "from": "2026-10-18", "to": "2026-10-05" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn ad_hoc_instance_is_keyed_by_subject_date_and_time() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "CS320").await;
    let payload = json!({
        "subject_id": subject_id,
        "class_date": "2026-10-07",
        "start_time": "14:00:00",
        "end_time": "15:00:00",
    });

    let (status, first) = app.post("/api/class-instances", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = app.post("/api/class-instances", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn clearing_a_mark_drops_reason_and_timestamp() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "CS330").await;
    let (_, instance) = app
        .post(
            "/api/class-instances",
            json!({
                "subject_id": subject_id,
                "class_date": "2026-10-08",
                "start_time": "09:00:00",
                "end_time": "10:00:00",
            }),
        )
        .await;
    let uri = format!("/api/class-instances/{}/attendance", id_of(&instance));

    let (_, excused) = app
        .patch(&uri, json!({ "status": "excused", "reason_code": "medical" }))
        .await;
    assert_eq!(excused["reason_code"], "medical");
    assert!(excused["marked_at"].is_string());

    let (_, cleared) = app.patch(&uri, json!({ "status": "unmarked" })).await;
    assert!(cleared["reason_code"].is_null());
    assert!(cleared["marked_at"].is_null());
}

#[tokio::test]
async fn subject_with_recorded_classes_cannot_be_deleted() {
    let app = spawn_app().await;
    let subject_id = create_subject(&app, "CS340").await;
    record_marks(&app, &subject_id, &["present"]).await;

    let (status, body) = app.delete(&format!("/api/subjects/{}", subject_id)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().expect("error").contains("class instances"));
    assert_eq!(app.count("subjects").await, 1);
}

#[tokio::test]
async fn duplicate_subject_code_is_rejected() {
    let app = spawn_app().await;
    create_subject(&app, "cs350").await;
    let (status, _) = app
        .post("/api/subjects", json!({ "name": "Other", "code": "CS350" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
