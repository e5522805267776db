//! Integration tests for token login.

#![allow(clippy::unwrap_used)]

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::Value;

use shop_ve_sinh_api::config::AdminSeedConfig;
use shop_ve_sinh_api::services::auth::{AccessClaims, SeedOutcome, TokenIssuer, seed_admin};
use shop_ve_sinh_core::Username;
use shop_ve_sinh_integration_tests::{
    ADMIN_PASSWORD, ADMIN_USERNAME, JWT_SECRET, TOKEN_TTL_MINUTES, TestServer,
};

async fn login(server: &TestServer, username: &str, password: &str) -> reqwest::Response {
    server
        .client
        .post(server.url("/api/auth/token"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_login_issues_bearer_token() {
    let server = TestServer::spawn().await.unwrap();

    let resp = login(&server, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap();

    let claims = jsonwebtoken::decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap()
    .claims;
    assert_eq!(claims.sub, ADMIN_USERNAME);
    assert_eq!(claims.exp - claims.iat, TOKEN_TTL_MINUTES * 60);
}

#[tokio::test]
async fn test_login_accepts_oauth2_extra_fields() {
    let server = TestServer::spawn().await.unwrap();

    let resp = server
        .client
        .post(server.url("/api/auth/token"))
        .form(&[
            ("grant_type", "password"),
            ("username", ADMIN_USERNAME),
            ("password", ADMIN_PASSWORD),
            ("scope", ""),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let server = TestServer::spawn().await.unwrap();

    for (username, password) in [
        (ADMIN_USERNAME, "wrong-password"),
        ("nobody", ADMIN_PASSWORD),
    ] {
        let resp = login(&server, username, password).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()["www-authenticate"], "Bearer");

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["detail"], "Incorrect username or password");
    }
}

#[tokio::test]
async fn test_missing_form_fields_is_422() {
    let server = TestServer::spawn().await.unwrap();

    let resp = server
        .client
        .post(server.url("/api/auth/token"))
        .form(&[("username", ADMIN_USERNAME)])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_reseeding_keeps_existing_admin() {
    let server = TestServer::spawn().await.unwrap();

    let tokens = TokenIssuer::new(
        &SecretString::from(JWT_SECRET),
        TimeDelta::try_minutes(TOKEN_TTL_MINUTES).unwrap(),
    );
    let seed = AdminSeedConfig {
        username: Username::parse(ADMIN_USERNAME).unwrap(),
        password: SecretString::from("a-different-password"),
    };

    let outcome = seed_admin(&server.pool, &tokens, &seed).await.unwrap();
    assert_eq!(outcome, SeedOutcome::AlreadyExists);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM adminuser")
        .fetch_one(&server.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let resp = login(&server, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
