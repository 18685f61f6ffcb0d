mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, Local, NaiveDate};
use common::{id_of, spawn_app};
use serde_json::{json, Value as JsonValue};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn day(offset: i64) -> String {
    (today() + Duration::days(offset)).to_string()
}

fn item_ids(items: &JsonValue) -> Vec<String> {
    items
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn closed_hackathons_stay_out_of_upcoming() {
    let app = spawn_app().await;
    let (_, registered) = app
        .post(
            "/api/hackathons",
            json!({
                "name": "Open Hack",
                "status": "registered",
                "submission_deadline": day(4),
            }),
        )
        .await;
    let (_, missed) = app
        .post(
            "/api/hackathons",
            json!({
                "name": "Gone Hack",
                "status": "missed",
                "submission_deadline": day(3),
            }),
        )
        .await;

    let (status, upcoming) = app.get("/api/calendar/upcoming").await;
    assert_eq!(status, StatusCode::OK);
    let ids = item_ids(&upcoming["items"]);
    assert!(ids.contains(&format!("hackathon:{}:submission", id_of(&registered))));
    assert!(!ids.iter().any(|id| id.contains(&id_of(&missed))));

    let item = &upcoming["items"][0];
    assert_eq!(item["days_until"], 4);
    assert_eq!(item["urgency"], "on_track");
    assert_eq!(item["derived"], true);
    assert_eq!(item["link"]["target"], "hackathon");
}

#[tokio::test]
async fn upcoming_is_chronological_and_tags_urgency() {
    let app = spawn_app().await;
    for (title, offset) in [("Later", 9), ("Today", 0), ("Soon", 2)] {
        let (status, _) = app
            .post(
                "/api/calendar/events",
                json!({ "title": title, "event_date": day(offset) }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app.post(
        "/api/calendar/events",
        json!({ "title": "Yesterday", "event_date": day(-1) }),
    )
    .await;

    let (_, upcoming) = app.get("/api/calendar/upcoming?limit=2").await;
    let items = upcoming["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Today");
    assert_eq!(items[0]["urgency"], "at_risk");
    assert_eq!(items[1]["title"], "Soon");
    assert_eq!(items[1]["urgency"], "tight");
}

#[tokio::test]
async fn derived_items_cannot_be_edited_or_deleted() {
    let app = spawn_app().await;
    let (_, project) = app
        .post(
            "/api/projects",
            json!({ "name": "Thesis", "deadline": day(10) }),
        )
        .await;
    let derived = format!("/api/calendar/events/project:{}:deadline", id_of(&project));

    let (status, body) = app.delete(&derived).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, _) = app.patch(&derived, json!({ "title": "Renamed" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn deleting_a_project_drops_its_deadline_but_keeps_manual_events() {
    let app = spawn_app().await;
    let (_, project) = app
        .post(
            "/api/projects",
            json!({ "name": "Thesis", "deadline": day(5) }),
        )
        .await;
    let project_id = id_of(&project);
    let (status, event) = app
        .post(
            "/api/calendar/events",
            json!({
                "title": "Advisor meeting",
                "event_date": day(3),
                "project_id": project_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["event_type"], "project");

    let (_, before) = app.get("/api/calendar/upcoming").await;
    assert_eq!(before["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(before["items"][0]["link"]["id"], project_id.as_str());

    let (status, _) = app.delete(&format!("/api/projects/{}", project_id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = app.get("/api/calendar/upcoming").await;
    let items = after["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], event["id"]);
    assert!(items[0]["link"].is_null());
    assert_eq!(items[0]["orphaned"], false);
}

#[tokio::test]
async fn month_view_merges_sources_within_bounds() {
    let app = spawn_app().await;
    let target = today() + Duration::days(45);
    let first = target.with_day(1).expect("first of month");

    app.post(
        "/api/projects",
        json!({ "name": "Capstone", "deadline": first.to_string(), "priority": "low" }),
    )
    .await;
    app.post(
        "/api/calendar/events",
        json!({ "title": "Exam", "event_date": first.to_string(), "priority": "high" }),
    )
    .await;
    app.post(
        "/api/calendar/events",
        json!({
            "title": "Next month",
            "event_date": (first + Duration::days(40)).to_string(),
        }),
    )
    .await;

    let (status, view) = app
        .get(&format!(
            "/api/calendar?year={}&month={}",
            target.year(),
            target.month()
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["from"], first.to_string());
    let items = view["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Exam");
    assert_eq!(items[1]["title"], "Capstone: deadline");

    let (status, _) = app.get("/api/calendar?year=2026&month=13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn passed_submission_is_only_suggested_as_missed() {
    let app = spawn_app().await;
    let (_, hackathon) = app
        .post(
            "/api/hackathons",
            json!({
                "name": "Late Hack",
                "status": "registered",
                "submission_deadline": day(-2),
            }),
        )
        .await;
    let hackathon_id = id_of(&hackathon);

    let (status, fetched) = app
        .get(&format!("/api/hackathons/{}", hackathon_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "registered");
    assert_eq!(fetched["suggested_status"], "missed");

    let (status, dashboard) = app.get("/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["missed_hackathons"][0]["id"], hackathon_id.as_str());
    assert_eq!(dashboard["tasks_by_status"]["todo"], 0);
    assert_eq!(dashboard["applications_by_stage"]["wishlist"], 0);

    let (_, history) = app
        .get(&format!("/api/hackathons/{}/history", hackathon_id))
        .await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));

    let (status, updated) = app
        .post(
            &format!("/api/hackathons/{}/status", hackathon_id),
            json!({ "status": "missed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "missed");
    assert!(updated["suggested_status"].is_null());
}

#[tokio::test]
async fn hackathon_dates_must_be_ordered() {
    let app = spawn_app().await;
    let (status, _) = app
        .post(
            "/api/hackathons",
            json!({ "name": "Backwards", "start_date": day(5), "end_date": day(2) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clearing_a_deadline_removes_its_calendar_entry() {
    let app = spawn_app().await;
    let (_, project) = app
        .post(
            "/api/projects",
            json!({ "name": "Thesis", "deadline": day(6) }),
        )
        .await;
    let project_id = id_of(&project);
    let (_, hackathon) = app
        .post(
            "/api/hackathons",
            json!({
                "name": "Spring Hack",
                "status": "registered",
                "registration_deadline": day(2),
                "submission_deadline": day(8),
            }),
        )
        .await;
    let hackathon_id = id_of(&hackathon);

    let (_, before) = app.get("/api/calendar/upcoming").await;
    assert_eq!(before["items"].as_array().map(Vec::len), Some(3));

    let (status, renamed) = app
        .patch(
            &format!("/api/projects/{}", project_id),
            json!({ "name": "Thesis v2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["deadline"], day(6));

    let (status, cleared) = app
        .patch(
            &format!("/api/projects/{}", project_id),
            json!({ "deadline": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["deadline"].is_null());

    let (status, hackathon) = app
        .patch(
            &format!("/api/hackathons/{}", hackathon_id),
            json!({ "registration_deadline": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(hackathon["registration_deadline"].is_null());
    assert_eq!(hackathon["submission_deadline"], day(8));

    let (_, after) = app.get("/api/calendar/upcoming").await;
    let ids = item_ids(&after["items"]);
    assert_eq!(ids, vec![format!("hackathon:{}:submission", hackathon_id)]);
}
