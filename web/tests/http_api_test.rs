//! HTTP API tests driving the router in-process.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use rsvp_core::{unfold, EventDetails, RecordBackend, RecordStore};
use rsvp_storage::InMemoryBackend;
use rsvp_testing::{test_clock, FailingBackend};
use rsvp_web::{build_router, AppState, REQUEST_ID_HEADER};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(backend: Arc<dyn RecordBackend>) -> Router {
    let clock = Arc::new(test_clock());
    let store = RecordStore::new(backend, clock.clone());
    build_router(AppState::new(store, EventDetails::default(), clock))
}

fn app() -> Router {
    app_with(Arc::new(InMemoryBackend::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body is JSON")
}

async fn submit(app: &Router, body: Value) -> Response {
    send(app, Method::POST, "/api/rsvp", Some(body)).await
}

#[tokio::test]
async fn test_submit_inserts_then_updates() {
    let app = app();

    let response = submit(
        &app,
        json!({"name": " Jo ", "email": "Jo@X.com", "attending": true, "adults": 2, "kids": "1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["rsvp"]["name"], "Jo");
    assert_eq!(body["rsvp"]["email"], "jo@x.com");
    assert_eq!(body["rsvp"]["attending"], true);
    assert_eq!(body["rsvp"]["adults"], 2);
    assert_eq!(body["rsvp"]["kids"], 1);
    assert_eq!(body["rsvp"]["dietary"], "");
    assert_eq!(body["rsvp"]["timestamp"], "2025-01-01T00:00:00Z");

    let response = submit(
        &app,
        json!({"name": "Jo", "email": "jo@x.COM", "attending": "no", "dietary": "vegan"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["rsvp"]["attending"], false);
    assert_eq!(body["rsvp"]["adults"], 0);
    assert_eq!(body["rsvp"]["dietary"], "vegan");

    let body = body_json(send(&app, Method::GET, "/api/responses", None).await).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_submit_validation_error_names_field() {
    let app = app();

    let response = submit(&app, json!({"name": "Jo", "email": "jo@x.com", "adults": -1})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field"], "adults");
    assert_eq!(body["message"], "Number of guests cannot be negative (adults)");

    let response = submit(&app, json!({"email": "jo@x.com"})).await;
    let body = body_json(response).await;
    assert_eq!(body["field"], "name");
    assert_eq!(body["message"], "Name is required");

    let response = submit(&app, json!({"name": "Jo", "email": "jo@x.com", "kids": 1.5})).await;
    let body = body_json(response).await;
    assert_eq!(body["field"], "kids");

    let body = body_json(send(&app, Method::GET, "/api/responses", None).await).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_submit_malformed_json_is_bad_request() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/rsvp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Jo\","))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body.get("field").is_none());
}

#[tokio::test]
async fn test_get_rsvp_found_and_missing() {
    let app = app();
    submit(&app, json!({"name": "Jo", "email": "jo@x.com", "adults": 3})).await;

    let response = send(&app, Method::GET, "/api/rsvp/JO@X.COM", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["found"], true);
    assert_eq!(body["rsvp"]["adults"], 3);

    let response = send(&app, Method::GET, "/api/rsvp/%20jo%40x.com%20", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, "/api/rsvp/nobody@x.com", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"found": false, "message": "No RSVP found for this email"})
    );
}

#[tokio::test]
async fn test_withdraw_rsvp() {
    let app = app();
    submit(&app, json!({"name": "Jo", "email": "jo@x.com"})).await;

    let response = send(&app, Method::DELETE, "/api/rsvp/Jo@X.com", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "message": "RSVP withdrawn"})
    );

    let response = send(&app, Method::DELETE, "/api/rsvp/jo@x.com", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["success"], false);

    let response = send(&app, Method::GET, "/api/rsvp/jo@x.com", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_summary() {
    let app = app();
    for body in [
        json!({"name": "A", "email": "a@x.com", "attending": true, "adults": 2, "kids": 1}),
        json!({"name": "B", "email": "b@x.com", "attending": false}),
        json!({"name": "C", "email": "c@x.com", "attending": "yes", "adults": 1, "kids": 2}),
    ] {
        submit(&app, body).await;
    }

    let response = send(&app, Method::GET, "/api/responses", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["attending"], 2);
    assert_eq!(body["not_attending"], 1);
    assert_eq!(body["total_adults"], 3);
    assert_eq!(body["total_kids"], 3);
    assert_eq!(body["total_guests"], 6);
    assert_eq!(body["responses"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_calendar_download() {
    let app = app();

    let response = send(&app, Method::GET, "/api/calendar", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/calendar; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Baby-Shower-2026.ics\""
    );

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(text.ends_with("END:VCALENDAR\r\n"));
    assert!(text.split("\r\n").all(|line| line.len() <= 75));

    let unfolded = unfold(&text);
    assert!(unfolded.contains("DTSTAMP:20250101T000000Z\r\n"));
    assert!(unfolded.contains("DTSTART:20260215T130000\r\n"));
    assert!(unfolded.contains("LOCATION:209 James River Drive\\, Hutto\\, TX 78634\r\n"));
}

#[tokio::test]
async fn test_health_check() {
    let response = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_metrics_not_routed_without_recorder() {
    let response = send(&app(), Method::GET, "/metrics", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let app = app();
    let responses = [
        send(&app, Method::GET, "/health", None).await,
        send(&app, Method::GET, "/api/rsvp/nobody@x.com", None).await,
        submit(&app, json!({"name": ""})).await,
    ];

    for response in &responses {
        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(uuid_like(id), "not a request id: {id}");
    }
}

fn uuid_like(id: &str) -> bool {
    id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = app_with(Arc::new(FailingBackend::new()));

    let response = submit(&app, json!({"name": "Jo", "email": "jo@x.com"})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert!(!body["message"].as_str().unwrap().contains("disk unavailable"));

    let response = send(&app, Method::GET, "/api/responses", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&app, Method::GET, "/api/rsvp/jo@x.com", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = submit(&app, json!({"name": "", "email": "jo@x.com"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
