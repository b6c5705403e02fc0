//! HTTP-level integration tests for auth and admin user management.
//!
//! Tests cover login, token refresh and rotation, logout, RBAC
//! enforcement, and account lockout.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_auth, post_json, post_json_auth, ROLE_ID_ADMIN, ROLE_ID_SUPER_ADMIN,
    ROLE_ID_VIEWER,
};
use sqlx::PgPool;

use formpulse_db::repositories::UserRepo;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    let body = serde_json::json!({ "username": username, "password": password });
    post_json(app, "/api/v1/auth/login", body).await
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with tokens and user info.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = common::seed_user(&pool, "loginuser", ROLE_ID_ADMIN).await;
    let app = common::build_test_app(pool);

    let response = login(app, "loginuser", "test_password_123!").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["role"], "admin");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::seed_user(&pool, "wrongpw", ROLE_ID_ADMIN).await;
    let app = common::build_test_app(pool);

    let response = login(app, "wrongpw", "incorrect_password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with a nonexistent username returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = login(app, "ghost", "whatever").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login to a deactivated account returns 403.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = common::seed_user(&pool, "inactive", ROLE_ID_ADMIN).await;
    UserRepo::deactivate(&pool, user.id)
        .await
        .expect("deactivation succeeds");
    let app = common::build_test_app(pool);

    let response = login(app, "inactive", "test_password_123!").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Five failed attempts lock the account; the correct password then also
/// fails with 403 until the lock expires.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_lockout_after_failed_attempts(pool: PgPool) {
    common::seed_user(&pool, "lockme", ROLE_ID_ADMIN).await;

    for _ in 0..5 {
        let app = common::build_test_app(pool.clone());
        let response = login(app, "lockme", "bad_password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let app = common::build_test_app(pool);
    let response = login(app, "lockme", "test_password_123!").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh / logout
// ---------------------------------------------------------------------------

/// A valid refresh token returns new tokens; the old refresh token is
/// rotated out and rejected on reuse.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_refresh_and_rotation(pool: PgPool) {
    common::seed_user(&pool, "refresher", ROLE_ID_ADMIN).await;

    let response = login(
        common::build_test_app(pool.clone()),
        "refresher",
        "test_password_123!",
    )
    .await;
    let login_json = body_json(response).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert!(refreshed["access_token"].is_string());
    assert_ne!(refreshed["refresh_token"], login_json["refresh_token"]);

    // Replaying the rotated-out token fails.
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes sessions so the refresh token stops working.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    common::seed_user(&pool, "leaver", ROLE_ID_ADMIN).await;

    let response = login(
        common::build_test_app(pool.clone()),
        "leaver",
        "test_password_123!",
    )
    .await;
    let json = body_json(response).await;
    let access_token = json["access_token"].as_str().unwrap().to_string();
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/logout",
        &access_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Admin user management + RBAC
// ---------------------------------------------------------------------------

/// A super admin can create users; the created user can log in.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_super_admin_creates_user(pool: PgPool) {
    let token = common::login_as(
        common::build_test_app(pool.clone()),
        &pool,
        "root",
        ROLE_ID_SUPER_ADMIN,
    )
    .await;

    let body = serde_json::json!({
        "username": "newadmin",
        "email": "newadmin@test.com",
        "password": "a_sufficiently_long_password",
        "role": "admin",
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newadmin");
    assert!(json["data"]["password_hash"].is_null(), "hash must not leak");

    let response = login(
        common::build_test_app(pool),
        "newadmin",
        "a_sufficiently_long_password",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Short passwords are rejected with 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_user_short_password_rejected(pool: PgPool) {
    let token = common::login_as(
        common::build_test_app(pool.clone()),
        &pool,
        "root",
        ROLE_ID_SUPER_ADMIN,
    )
    .await;

    let body = serde_json::json!({
        "username": "shorty",
        "email": "shorty@test.com",
        "password": "short",
        "role": "admin",
    });
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/users",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Plain admins cannot reach user management (403).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_cannot_manage_users(pool: PgPool) {
    let token = common::login_as(
        common::build_test_app(pool.clone()),
        &pool,
        "notroot",
        ROLE_ID_ADMIN,
    )
    .await;

    let response = get_auth(common::build_test_app(pool), "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Viewers cannot create forms (403), but unauthenticated requests are 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_cannot_create_forms(pool: PgPool) {
    let token = common::login_as(
        common::build_test_app(pool.clone()),
        &pool,
        "watcher",
        ROLE_ID_VIEWER,
    )
    .await;

    let body = serde_json::json!({ "title": "Quarterly NPS" });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/forms",
        &token,
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(common::build_test_app(pool), "/api/v1/forms", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
