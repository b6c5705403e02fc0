//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the production router construction so tests
//! exercise the same middleware stack (CORS, request ID, timeout, panic
//! recovery) the binary uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use formpulse_api::auth::jwt::JwtConfig;
use formpulse_api::auth::password::hash_password;
use formpulse_api::config::{RateLimitConfig, ServerConfig};
use formpulse_api::ratelimit::FixedWindowLimiter;
use formpulse_api::router::build_app_router;
use formpulse_api::state::AppState;
use formpulse_db::models::user::InsertUser;
use formpulse_db::repositories::UserRepo;

/// Role ids as seeded by the roles migration.
pub const ROLE_ID_SUPER_ADMIN: i64 = 1;
pub const ROLE_ID_ADMIN: i64 = 2;
pub const ROLE_ID_VIEWER: i64 = 3;

/// Build a test `ServerConfig` with safe defaults and a generous rate
/// limit so unrelated tests never trip it.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        rate_limit: RateLimitConfig {
            max_requests: 10_000,
            window_secs: 60,
        },
    }
}

/// Build the full application router with the default test config.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Build the full application router with a custom config (used by the
/// rate limiting tests).
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let rate_limiter = Arc::new(FixedWindowLimiter::new(&config.rate_limit));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        rate_limiter,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    app.oneshot(request).await.expect("request succeeds")
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds");
    app.oneshot(request).await.expect("request succeeds")
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    app.oneshot(request).await.expect("request succeeds")
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request builds");
    app.oneshot(request).await.expect("request succeeds")
}

/// Send a PUT request with a JSON body and a Bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request builds");
    app.oneshot(request).await.expect("request succeeds")
}

/// Send a DELETE request with a Bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds");
    app.oneshot(request).await.expect("request succeeds")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is valid JSON")
}

// ---------------------------------------------------------------------------
// Auth helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database. Returns the user row; the
/// password is always `test_password_123!`.
pub async fn seed_user(
    pool: &PgPool,
    username: &str,
    role_id: i64,
) -> formpulse_db::models::user::User {
    let hashed = hash_password("test_password_123!").expect("hashing succeeds");
    let input = InsertUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hashed,
        role_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation succeeds")
}

/// Seed a user and log them in through the API, returning an access token.
pub async fn login_as(app: Router, pool: &PgPool, username: &str, role_id: i64) -> String {
    seed_user(pool, username, role_id).await;
    let body = serde_json::json!({ "username": username, "password": "test_password_123!" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"]
        .as_str()
        .expect("login returns access_token")
        .to_string()
}
