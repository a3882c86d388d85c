// ==============================
// crates/backend-lib/tests/router_tests.rs
// ==============================
//! HTTP boundary tests: status codes and wire shapes per endpoint.
mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use backend_lib::router::create_router;
use backend_lib::storage::CredentialStore;
use common::{seed_admin, seed_invite, seed_user, test_state};
use serde_json::{json, Value};
use tower::ServiceExt;

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_with_headers(uri: &str, body: Value, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> axum::response::Response {
    router.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_register_endpoint() {
    let state = test_state();
    let router = create_router(state.clone());
    let invite = seed_invite(&state, "a@x.com").await;

    let response = send(
        &router,
        post(
            "/api/auth/register",
            json!({
                "inviteToken": invite.token,
                "email": "a@x.com",
                "username": "alice",
                "name": "Alice",
                "password": "longenough1",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], "a@x.com");
    assert!(body["id"].is_string());

    // replaying the invite is a 400 with the used-link code
    let response = send(
        &router,
        post(
            "/api/auth/register",
            json!({
                "inviteToken": invite.token,
                "email": "b@x.com",
                "username": "bob",
                "name": "Bob",
                "password": "longenough1",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "LINK_002");
}

#[tokio::test]
async fn test_register_rejects_malformed_input() {
    let state = test_state();
    let router = create_router(state.clone());
    let invite = seed_invite(&state, "a@x.com").await;

    let response = send(
        &router,
        post(
            "/api/auth/register",
            json!({
                "inviteToken": invite.token,
                "email": "not-an-email",
                "username": "alice",
                "name": "Alice",
                "password": "longenough1",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VAL_001");
}

#[tokio::test]
async fn test_invite_validate_endpoint() {
    let state = test_state();
    let router = create_router(state.clone());
    let invite = seed_invite(&state, "a@x.com").await;

    let request = Request::builder()
        .uri(format!("/api/auth/invite/validate?token={}", invite.token))
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);

    let request = Request::builder()
        .uri("/api/auth/invite/validate?token=unknown")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_endpoint_shapes() {
    let state = test_state();
    let router = create_router(state.clone());
    seed_user(&state, "a@x.com", "longenough1").await;

    let response = send(
        &router,
        post(
            "/api/auth/login",
            json!({"email": "a@x.com", "password": "longenough1"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["accessToken"].is_string());
    assert!(body["refreshToken"].is_string());
    assert!(body["accessTokenExpiresAt"].is_string());
    assert!(body["refreshTokenExpiresAt"].is_string());

    let response = send(
        &router,
        post(
            "/api/auth/login",
            json!({"email": "a@x.com", "password": "wrong-password"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rate_limit_returns_429_per_client() {
    let state = test_state();
    let router = create_router(state.clone());
    seed_user(&state, "a@x.com", "longenough1").await;

    let bad = json!({"email": "a@x.com", "password": "wrong-password"});
    for _ in 0..5 {
        let response = send(
            &router,
            post_with_headers("/api/auth/login", bad.clone(), &[("x-real-ip", "203.0.113.1")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // sixth attempt from the same client, correct password, still refused
    let response = send(
        &router,
        post_with_headers(
            "/api/auth/login",
            json!({"email": "a@x.com", "password": "longenough1"}),
            &[("x-real-ip", "203.0.113.1")],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // another client is free to log in
    let response = send(
        &router,
        post_with_headers(
            "/api/auth/login",
            json!({"email": "a@x.com", "password": "longenough1"}),
            &[("x-real-ip", "203.0.113.2")],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_endpoint() {
    let state = test_state();
    let router = create_router(state.clone());
    seed_user(&state, "a@x.com", "longenough1").await;

    let response = send(
        &router,
        post(
            "/api/auth/login",
            json!({"email": "a@x.com", "password": "longenough1"}),
        ),
    )
    .await;
    let tokens = body_json(response).await;

    let response = send(
        &router,
        post(
            "/api/auth/token/refresh",
            json!({"refreshToken": tokens["refreshToken"]}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["accessToken"].is_string());
    assert!(body["expiresAt"].is_string());
    // no rotation configured: no replacement token in the body
    assert!(body.get("refreshToken").is_none());

    let response = send(
        &router,
        post("/api/auth/token/refresh", json!({"refreshToken": "bogus"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_endpoints_are_gated() {
    let state = test_state();
    let router = create_router(state.clone());
    seed_admin(&state).await;
    seed_user(&state, "plain@x.com", "longenough1").await;

    let invite_body = json!({"email": "new@x.com"});

    // no bearer
    let response = send(&router, post("/api/auth/admin/invite", invite_body.clone())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // non-admin bearer
    let (access, _) = state
        .auth
        .login("plain@x.com", "longenough1".into(), "10.0.0.1")
        .await
        .unwrap();
    let response = send(
        &router,
        post_with_headers(
            "/api/auth/admin/invite",
            invite_body.clone(),
            &[("authorization", &format!("Bearer {}", access.jwt))],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // admin bearer mints an invite
    let (access, _) = state
        .auth
        .login("admin@x.com", "admin-password-1".into(), "10.0.0.1")
        .await
        .unwrap();
    let auth_header = format!("Bearer {}", access.jwt);
    let response = send(
        &router,
        post_with_headers(
            "/api/auth/admin/invite",
            invite_body,
            &[("authorization", &auth_header)],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], "new@x.com");
    assert!(body["token"].is_string());
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn test_password_reset_confirm_endpoint() {
    let state = test_state();
    let router = create_router(state.clone());
    let user = seed_user(&state, "a@x.com", "longenough1").await;
    let admin = state
        .store
        .find_user_by_email("admin@x.com")
        .await
        .unwrap()
        .unwrap();

    // admin requests a reset link for the user
    let (access, _) = state
        .auth
        .login("admin@x.com", "admin-password-1".into(), "10.0.0.1")
        .await
        .unwrap();
    assert!(admin.is_admin);
    let response = send(
        &router,
        post_with_headers(
            "/api/auth/admin/password-reset",
            json!({"userId": user.id}),
            &[("authorization", &format!("Bearer {}", access.jwt))],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let link = body_json(response).await;

    // confirm once: 200
    let response = send(
        &router,
        post(
            "/api/auth/password-reset/confirm",
            json!({"resetToken": link["token"], "newPassword": "brand-new-pass1"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // confirm twice: 400, already used
    let response = send(
        &router,
        post(
            "/api/auth/password-reset/confirm",
            json!({"resetToken": link["token"], "newPassword": "brand-new-pass1"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "LINK_002");
}
