//! Router-level tests for the quiz hosting API

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use quiz_timer::{create_router, AppState};

fn app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string(), None));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, router) = app();
    let (status, body) = send(&router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn quiz_lifecycle_over_http() {
    let (_, router) = app();

    let (status, _) = send(&router, Method::GET, "/quiz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &router,
        Method::POST,
        "/quiz",
        Some(json!({ "quiz_id": "biology-1", "duration_seconds": 1800 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["quiz"]["quiz_id"], "biology-1");
    assert_eq!(body["quiz"]["timer"]["mode"], "countdown");
    assert_eq!(body["quiz"]["timer"]["state"], "running");
    assert_eq!(body["quiz"]["display"]["text"], "30:00");
    assert_eq!(body["quiz"]["timer"]["display"]["text"], "30:00");

    let (status, body) = send(&router, Method::POST, "/quiz", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (status, body) = send(&router, Method::POST, "/quiz/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submission"]["reason"], "manual");

    let (status, _) = send(&router, Method::POST, "/quiz/submit", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&router, Method::GET, "/quiz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quiz"]["timer"]["state"], "stopped");

    let (status, body) = send(&router, Method::GET, "/notifications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notifications"][0]["level"], "success");
}

#[tokio::test]
async fn negative_duration_is_a_bad_request() {
    let (_, router) = app();

    let (status, body) = send(&router, Method::POST, "/quiz", Some(json!({ "duration_seconds": -10 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("-10"));
}

#[tokio::test]
async fn submit_without_quiz_is_not_found() {
    let (_, router) = app();

    let (status, _) = send(&router, Method::POST, "/quiz/submit", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leave_clears_the_session() {
    let (_, router) = app();

    send(&router, Method::POST, "/quiz", Some(json!({}))).await;

    let (status, body) = send(&router, Method::POST, "/quiz/leave", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quiz"]["timer"]["mode"], "stopwatch");
    assert_eq!(body["quiz"]["timer"]["state"], "stopped");

    let (status, body) = send(&router, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["quiz"].is_null());
}

#[tokio::test]
async fn dismissing_notices() {
    let (state, router) = app();
    let notice = state.notifications.info("Welcome to the School Platform!");

    let (status, _) = send(&router, Method::DELETE, &format!("/notifications/{}", notice.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, Method::DELETE, &format!("/notifications/{}", notice.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn expired_quiz_shows_time_up() {
    let (_, router) = app();

    send(&router, Method::POST, "/quiz", Some(json!({ "duration_seconds": 2 }))).await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let (_, body) = send(&router, Method::GET, "/quiz", None).await;
    assert_eq!(body["quiz"]["timer"]["state"], "expired");
    assert_eq!(body["quiz"]["submission"]["reason"], "time_up");

    let (_, body) = send(&router, Method::GET, "/notifications", None).await;
    let levels: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["level"].as_str().unwrap())
        .collect();
    assert_eq!(levels, vec!["warning", "danger"]);
}
