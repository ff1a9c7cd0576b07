//! Course endpoint integration tests
//!
//! Tests for course creation with server-assigned ids, the public
//! catalog reads, and the owner query filter.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;

use common::auth_helpers::{bearer, create_test_user, seed_course, test_server, test_state};
use common::database::TestDatabase;

#[tokio::test]
async fn test_create_course_requires_authentication() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let response = server
        .post("/api/courses")
        .json(&serde_json::json!({ "course_name": "Rust Basics" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_create_course_assigns_ids_and_owner() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let user = create_test_user(db.pool(), "teacher@example.com", "password123").await;

    let response = server
        .post("/api/courses")
        .add_header(AUTHORIZATION, bearer(&user.token))
        .json(&serde_json::json!({
            "course_name": "Rust Basics",
            "course_level": "Beginner",
            "institute": "Example Institute",
            "course_type": "Online",
            "duration": 6,
            "modules": [
                {
                    "title": "Getting Started",
                    "lessons": [
                        { "title": "Installing the toolchain" },
                        { "title": "Hello, world", "content": "fn main() {}" }
                    ]
                },
                { "title": "Ownership", "lessons": [{ "title": "Moves" }] }
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();

    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["owner_email"], "teacher@example.com");
    assert_eq!(body["modules"].as_array().unwrap().len(), 2);

    // Module and lesson ids are assigned server-side
    for module in body["modules"].as_array().unwrap() {
        assert!(module["id"].as_str().is_some_and(|id| !id.is_empty()));
        for lesson in module["lessons"].as_array().unwrap() {
            assert!(lesson["id"].as_str().is_some_and(|id| !id.is_empty()));
        }
    }
    assert_eq!(
        body["modules"][0]["lessons"][1]["content"],
        "fn main() {}"
    );
}

#[tokio::test]
async fn test_create_course_rejects_blank_name() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let user = create_test_user(db.pool(), "teacher@example.com", "password123").await;

    let response = server
        .post("/api/courses")
        .add_header(AUTHORIZATION, bearer(&user.token))
        .json(&serde_json::json!({ "course_name": "   " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Course name is required");
}

#[tokio::test]
async fn test_get_course_is_public() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let course = seed_course(db.pool(), "teacher@example.com", "Rust Basics", &[2]).await;

    let response = server.get(&format!("/api/courses/{}", course.id)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["course_name"], "Rust Basics");
    assert_eq!(body["modules"][0]["lessons"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_unknown_course_is_404() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let response = server.get("/api/courses/no-such-id").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Course not found");
}

#[tokio::test]
async fn test_list_courses_supports_owner_filter() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    seed_course(db.pool(), "teacher@example.com", "Rust Basics", &[1]).await;
    seed_course(db.pool(), "teacher@example.com", "Advanced Rust", &[1]).await;
    seed_course(db.pool(), "other@example.com", "Go Basics", &[1]).await;

    let all = server.get("/api/courses").await;
    assert_eq!(all.status_code(), StatusCode::OK);
    let body: Vec<serde_json::Value> = all.json();
    assert_eq!(body.len(), 3);

    let filtered = server
        .get("/api/courses")
        .add_query_param("owner", "teacher@example.com")
        .await;
    assert_eq!(filtered.status_code(), StatusCode::OK);
    let body: Vec<serde_json::Value> = filtered.json();
    assert_eq!(body.len(), 2);
    for course in &body {
        assert_eq!(course["owner_email"], "teacher@example.com");
    }
}
