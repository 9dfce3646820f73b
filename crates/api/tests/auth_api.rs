//! HTTP-level integration tests for registration, login, and `/me`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Register a user via the API and return the JSON response containing
/// `access_token` and `user` info.
async fn register_user(app: axum::Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Successful registration returns 201 with a token and the derived slug.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool);

    let json = register_user(app, "ada.lovelace@example.com", "difference-engine").await;

    assert!(json["access_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["email"], "ada.lovelace@example.com");
    // Slug is the normalized email local part.
    assert_eq!(json["user"]["portfolio_slug"], "adalovelace");
}

/// A second registration with the same email returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool.clone());
    register_user(app, "dup@example.com", "password-one").await;

    let (app, _store) = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "dup@example.com", "password": "password-two" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Two users whose email local parts collide get distinct slugs.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_slug_collision_gets_suffix(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool.clone());
    let first = register_user(app, "sam@alpha.example", "password-one").await;

    let (app, _store) = common::build_test_app(pool);
    let second = register_user(app, "sam@bravo.example", "password-two").await;

    assert_eq!(first["user"]["portfolio_slug"], "sam");
    assert_eq!(second["user"]["portfolio_slug"], "sam-2");
}

/// A malformed email is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_invalid_email(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "not-an-email", "password": "long-enough" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A too-short password is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_short_password(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "short@example.com", "password": "tiny" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login with correct credentials returns a token and user info.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool.clone());
    register_user(app, "login@example.com", "my-safe-password").await;

    let (app, _store) = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "login@example.com", "password": "my-safe-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["email"], "login@example.com");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool.clone());
    register_user(app, "wrongpw@example.com", "my-safe-password").await;

    let (app, _store) = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "wrongpw@example.com", "password": "incorrect" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login for an unknown email returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@example.com", "password": "whatever-long" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// /me
// ---------------------------------------------------------------------------

/// A valid token resolves to the user's own profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_with_valid_token(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool.clone());
    let json = register_user(app, "me@example.com", "my-safe-password").await;
    let token = json["access_token"].as_str().unwrap();

    let (app, _store) = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/me", token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "me@example.com");
    assert_eq!(json["data"]["portfolio_slug"], "me");
}

/// A missing Authorization header returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_without_token(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A garbage token returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_with_invalid_token(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/me", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
