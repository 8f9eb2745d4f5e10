/// Request-boundary tests that run without a database
///
/// The router is wired to a pool that can never connect, so every 4xx here is
/// produced before any database access.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{bearer, expired_token_for, offline_app, request, send, token_for};
use serde_json::json;
use todo_shared::auth::jwt::{issue_token, TokenClaims, TokenSettings};
use tower::Service as _;
use uuid::Uuid;

#[tokio::test]
async fn test_health_needs_no_auth_or_database() {
    let (status, body) = send(&offline_app(), request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_missing_header_is_unauthorized() {
    let (status, body) = send(&offline_app(), request("GET", "/api/alice/tasks", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Authorization header missing");
}

#[tokio::test]
async fn test_malformed_headers_are_unauthorized() {
    let token = token_for("alice");
    let app = offline_app();

    for header_value in [
        format!("Token {}", token),
        "Bearer".to_string(),
        format!("Bearer {} extra", token),
        token.clone(),
    ] {
        let (status, body) = send(
            &app,
            request("GET", "/api/alice/tasks", Some(&header_value), None),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", header_value);
        assert_eq!(
            body["message"],
            "Invalid authorization header format. Expected 'Bearer <token>'"
        );
    }
}

#[tokio::test]
async fn test_lowercase_scheme_is_accepted() {
    // Passes auth and ownership, then fails validation: still no database
    let auth = format!("bearer {}", token_for("alice"));
    let (status, _) = send(
        &offline_app(),
        request("POST", "/api/alice/tasks", Some(&auth), Some(json!({ "title": "" }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_signature_is_unauthorized() {
    let other = TokenSettings::hs256("another-secret-that-is-32-bytes-long!!");
    let claims = TokenClaims::for_subject("alice", Utc::now(), Duration::hours(1));
    let forged = issue_token(&claims, &other).unwrap();

    let (status, body) = send(
        &offline_app(),
        request("GET", "/api/alice/tasks", Some(&bearer(&forged)), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid authentication token");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let (status, _) = send(
        &offline_app(),
        request("GET", "/api/alice/tasks", Some("Bearer not.a.jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let token = expired_token_for("alice");

    let (status, body) = send(
        &offline_app(),
        request("GET", "/api/alice/tasks", Some(&bearer(&token)), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn test_token_without_subject_is_unauthorized() {
    let claims = TokenClaims {
        sub: None,
        iat: Some(Utc::now().timestamp()),
        exp: Some((Utc::now() + Duration::hours(1)).timestamp()),
    };
    let token = issue_token(&claims, &common::settings()).unwrap();

    let (status, body) = send(
        &offline_app(),
        request("GET", "/api/alice/tasks", Some(&bearer(&token)), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token payload: missing user ID");
}

#[tokio::test]
async fn test_every_task_route_requires_auth() {
    let app = offline_app();
    let id = Uuid::new_v4();

    for (method, uri) in [
        ("POST", "/api/alice/tasks".to_string()),
        ("GET", "/api/alice/tasks".to_string()),
        ("GET", format!("/api/alice/tasks/{}", id)),
        ("PUT", format!("/api/alice/tasks/{}", id)),
        ("DELETE", format!("/api/alice/tasks/{}", id)),
        ("PATCH", format!("/api/alice/tasks/{}/complete", id)),
    ] {
        let (status, _) = send(&app, request(method, &uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_foreign_user_path_is_forbidden() {
    let auth = bearer(&token_for("alice"));
    let app = offline_app();
    let id = Uuid::new_v4();

    for (method, uri) in [
        ("GET", "/api/bob/tasks".to_string()),
        ("GET", format!("/api/bob/tasks/{}", id)),
        ("DELETE", format!("/api/bob/tasks/{}", id)),
        ("PATCH", format!("/api/bob/tasks/{}/complete", id)),
    ] {
        let (status, body) = send(&app, request(method, &uri, Some(&auth), None)).await;

        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(body["error"], "forbidden");
        assert_eq!(body["message"], "Cannot access other users' tasks");
    }
}

#[tokio::test]
async fn test_ownership_is_checked_before_body_validation() {
    let auth = bearer(&token_for("alice"));

    let (status, _) = send(
        &offline_app(),
        request("POST", "/api/bob/tasks", Some(&auth), Some(json!({ "title": "" }))),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_id_comparison_is_exact() {
    let auth = bearer(&token_for("alice"));

    let (status, _) = send(
        &offline_app(),
        request("GET", "/api/Alice/tasks", Some(&auth), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let auth = bearer(&token_for("alice"));
    let app = offline_app();

    for body in [
        json!({ "title": "" }),
        json!({ "title": "a".repeat(201) }),
        json!({ "title": "ok", "description": "d".repeat(1001) }),
        json!({ "title": "nul\u{0}inside" }),
        json!({ "title": "ok", "description": "nul\u{0}inside" }),
    ] {
        let (status, response) = send(
            &app,
            request("POST", "/api/alice/tasks", Some(&auth), Some(body.clone())),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response["error"], "validation_error");
        assert!(response["details"].is_array());
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let auth = bearer(&token_for("alice"));
    let app = offline_app();

    let raw = Request::builder()
        .method("POST")
        .uri("/api/alice/tasks")
        .header(header::AUTHORIZATION, &auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();
    let (status, body) = send(&app, raw).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    // Missing required field
    let (status, _) = send(
        &app,
        request("POST", "/api/alice/tasks", Some(&auth), Some(json!({ "description": "x" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong type
    let uri = format!("/api/alice/tasks/{}", Uuid::new_v4());
    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(&auth), Some(json!({ "completed": "yes" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_validation_errors() {
    let auth = bearer(&token_for("alice"));
    let uri = format!("/api/alice/tasks/{}", Uuid::new_v4());

    let (status, body) = send(
        &offline_app(),
        request("PUT", &uri, Some(&auth), Some(json!({ "title": "" }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_update_with_nul_character_is_bad_request() {
    let auth = bearer(&token_for("alice"));
    let uri = format!("/api/alice/tasks/{}", Uuid::new_v4());

    let (status, body) = send(
        &offline_app(),
        request("PUT", &uri, Some(&auth), Some(json!({ "description": "a\u{0}b" }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "description");
}

#[tokio::test]
async fn test_invalid_task_id_is_bad_request() {
    let auth = bearer(&token_for("alice"));
    let app = offline_app();

    for (method, uri) in [
        ("GET", "/api/alice/tasks/not-a-uuid"),
        ("DELETE", "/api/alice/tasks/not-a-uuid"),
        ("PATCH", "/api/alice/tasks/not-a-uuid/complete"),
    ] {
        let (status, body) = send(&app, request(method, uri, Some(&auth), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["message"], "Invalid task id");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(&offline_app(), request("GET", "/api/alice/projects", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let mut app = offline_app();

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api/alice/tasks/00000000-0000-0000-0000-000000000000/complete")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.call(preflight).await.unwrap();
    let headers = response.headers();

    assert!(response.status().is_success());
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert!(headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .contains("PATCH"));
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let mut app = offline_app();

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api/alice/tasks")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = app.call(preflight).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
