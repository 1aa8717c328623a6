// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use octofit_tracker::config::Config;
use octofit_tracker::db::{FirestoreDb, MemoryDb};
use octofit_tracker::routes::create_router;
use octofit_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, Arc::new(MemoryDb::new())));
    (create_router(state.clone()), state)
}

/// Build a request with an optional JSON body.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Build an admin POST carrying the test admin key.
#[allow(dead_code)]
pub fn admin_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, "Bearer test_admin_key")
        .body(Body::empty())
        .unwrap()
}

/// Send a request and decode the JSON response body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Create a team through the API and return its id.
#[allow(dead_code)]
pub async fn create_team(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        json_request("POST", "/api/teams", Some(serde_json::json!({ "name": name }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create team: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Create a user through the API and return its id.
#[allow(dead_code)]
pub async fn create_user(app: &Router, username: &str, team_id: Option<&str>) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "full_name": username,
                "team_id": team_id,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Log an activity with explicit points and return its id.
#[allow(dead_code)]
pub async fn create_activity(
    app: &Router,
    user_id: &str,
    activity_type: &str,
    points: i64,
) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/activities",
            Some(serde_json::json!({
                "user_id": user_id,
                "activity_type": activity_type,
                "duration": 30,
                "points": points,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create activity: {body}");
    body["id"].as_str().unwrap().to_string()
}
