mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn health_endpoint_is_public() {
    let (router, _store) = common::test_app();

    let (status, body) = common::send(&router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn root_endpoint_is_public() {
    let (router, _store) = common::test_app();

    let (status, body) = common::send(&router, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Tracker API");
}

#[tokio::test]
async fn unauthenticated_list_projects_is_401() {
    let (router, _store) = common::test_app();

    let (status, body) = common::send(&router, "GET", "/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn every_resource_route_requires_a_principal() {
    let (router, _store) = common::test_app();
    let id = Uuid::new_v4();

    let routes = [
        ("GET", "/projects".to_string()),
        ("POST", "/projects".to_string()),
        ("GET", format!("/projects/{}", id)),
        ("PATCH", format!("/projects/{}", id)),
        ("GET", format!("/tasks?projectId={}", id)),
        ("POST", format!("/tasks?projectId={}", id)),
        ("PATCH", format!("/tasks/{}", id)),
        ("DELETE", format!("/tasks/{}", id)),
    ];

    for (method, path) in routes {
        let (status, body) = common::send(&router, method, &path, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, path);
        assert_eq!(body["error"], "Unauthorized", "{} {}", method, path);
    }
}

#[tokio::test]
async fn malformed_bearer_token_is_401() {
    let (router, _store) = common::test_app();

    let (status, body) =
        common::send(&router, "GET", "/projects", Some("definitely-not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn valid_token_reaches_the_handler() {
    let (router, _store) = common::test_app();
    let token = common::user_token(Uuid::new_v4(), "mika@example.com");

    let (status, body) = common::send(&router, "GET", "/projects", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "projects": [] }));
}
