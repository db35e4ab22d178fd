mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use timetable_engine::api::router;
use timetable_engine::state::AppState;

async fn test_app() -> Router {
    let pool = common::setup_db().await;
    router(AppState { db: pool })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn entry_body(section_id: &str, teacher_id: &str) -> Value {
    json!({
        "academic_year_id": "ay-2025",
        "section_id": section_id,
        "subject_id": "sub-1",
        "teacher_id": teacher_id,
        "period_id": "p-2",
        "day_of_week": 0,
        "room_number": "101",
        "created_by": "admin-1",
    })
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_conflict_and_delete_round_trip() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/timetable/entries", entry_body("sec-a", "t-1")))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["section_name"], json!("Section A"));
    assert_eq!(body["data"]["main_school_id"], json!("school-1"));
    let entry_id = body["data"]["id"].as_str().expect("entry id").to_string();

    // Same teacher/slot from another section: 409 in the error envelope.
    let response = app
        .clone()
        .oneshot(post_json("/timetable/entries", entry_body("sec-b", "t-1")))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("conflict"));
    assert!(
        body["error"]["message"].as_str().unwrap().contains("Section A"),
        "message was: {}",
        body["error"]["message"]
    );

    // Dry-run check agrees.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/timetable/conflict-check?teacher_id=t-1&day_of_week=0&period_id=p-2&academic_year_id=ay-2025")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["has_conflict"], json!(true));

    // Excluding the occupying entry clears the dry-run conflict.
    let uri = format!(
        "/timetable/conflict-check?teacher_id=t-1&day_of_week=0&period_id=p-2&academic_year_id=ay-2025&exclude_entry_id={entry_id}"
    );
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Request failed");
    let body = body_json(response).await;
    assert_eq!(body["data"]["has_conflict"], json!(false));

    // Hard delete frees the slot for the retry.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/timetable/entries/{entry_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json("/timetable/entries", entry_body("sec-b", "t-1")))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["section_name"], json!("Section B"));
}

#[tokio::test]
async fn test_current_class_with_pinned_clock() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/timetable/entries", entry_body("sec-a", "t-1")))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    // 2025-09-01 is a Monday; 09:10 is inside Period 2.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/timetable/teacher/t-1/current-class?at=2025-09-01T09:10:00Z")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["period_name"], json!("Period 2"));

    // After the period ends the teacher is free.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/timetable/teacher/t-1/current-class?at=2025-09-01T09:45:00Z")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");
    let body = body_json(response).await;
    assert_eq!(body["data"], Value::Null);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/timetable/teacher/t-1/current-class?at=not-a-timestamp")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("validation_error"));
}

#[tokio::test]
async fn test_bad_date_and_unknown_ids() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/attendance/sessions?date=01-09-2025")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/timetable/section/sec-x?academic_year_id=ay-2025")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("not_found"));
}
