//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                       - Welcome message
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (database reachable)
//!
//! # Products (no auth)
//! GET    /api/products/          - List products (?offset=&limit=)
//! POST   /api/products/          - Create product
//! GET    /api/products/{id}      - Get product
//! PATCH  /api/products/{id}      - Partially update product
//! DELETE /api/products/{id}      - Delete product
//!
//! # Admin (no auth)
//! GET    /api/admin/dashboard    - Dashboard stats
//!
//! # Auth
//! POST   /api/auth/token         - Password login (form body), returns bearer token
//! ```
//!
//! The product collection also answers without the trailing slash.

pub mod auth;
pub mod dashboard;
pub mod products;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Greeting returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to Shop Ve Sinh Backend API";

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
}

/// All API routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(products::routes())
        .merge(dashboard::routes())
        .merge(auth::routes())
}

/// The complete application: routes, middleware and state.
///
/// Layers, outermost first: Sentry, CORS, request tracing.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        // Any origin, method and header, with credentials
        .layer(CorsLayer::very_permissive())
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

async fn root() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME_MESSAGE.to_owned(),
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::TimeDelta;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AdminSeedConfig, AuthConfig, LogFormat, ShopConfig};
    use crate::db::{create_memory_pool, ensure_schema};
    use shop_ve_sinh_core::Username;

    async fn test_state() -> AppState {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        let config = ShopConfig {
            database_path: PathBuf::from(":memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            auth: AuthConfig {
                jwt_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6v"),
                token_ttl: TimeDelta::try_minutes(30).unwrap(),
            },
            admin_seed: AdminSeedConfig {
                username: Username::parse("admin").unwrap(),
                password: SecretString::from("admin123CHANGEME"),
            },
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        AppState::new(config, pool)
    }

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app(test_state().await)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_root_returns_welcome() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_product_detail() {
        let (status, body) = get("/api/products/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Product not found");
    }

    #[tokio::test]
    async fn test_offset_beyond_u32_lists_nothing() {
        let (status, body) = get("/api/products/?offset=4294967296").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_empty_catalog_dashboard() {
        let (status, body) = get("/api/admin/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_products"], 0);
        assert_eq!(body["system_status"], "healthy");
    }
}
