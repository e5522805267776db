//! Integration tests for Shop Ve Sinh.
//!
//! Each test spawns the full application (router, middleware, state) on an
//! ephemeral localhost port, backed by a private in-memory SQLite database,
//! and talks to it over real HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shop-ve-sinh-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `products` - Catalog CRUD and pagination
//! - `auth` - Token login
//! - `dashboard` - Admin stats, root and health endpoints

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono::TimeDelta;
use reqwest::Client;
use secrecy::SecretString;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use shop_ve_sinh_api::config::{AdminSeedConfig, AuthConfig, LogFormat, ShopConfig};
use shop_ve_sinh_api::services::auth::seed_admin;
use shop_ve_sinh_api::{AppState, app, db};
use shop_ve_sinh_core::Username;

/// Username of the seeded admin account.
pub const ADMIN_USERNAME: &str = "admin";
/// Password of the seeded admin account.
pub const ADMIN_PASSWORD: &str = "Vs!9pQ2#bathroom-fixtures";
/// Signing secret used by test servers.
pub const JWT_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6v";
/// Token lifetime used by test servers.
pub const TOKEN_TTL_MINUTES: i64 = 30;

/// Errors raised while starting a test server.
pub type SpawnError = Box<dyn std::error::Error + Send + Sync>;

/// A running application instance.
///
/// The server task is aborted on drop.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub pool: SqlitePool,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with a fresh database and the seeded admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database, seeding, or bind fails.
    pub async fn spawn() -> Result<Self, SpawnError> {
        let pool = db::create_memory_pool().await?;
        db::ensure_schema(&pool).await?;

        let state = AppState::new(test_config()?, pool.clone());
        seed_admin(state.pool(), state.tokens(), &state.config().admin_seed).await?;

        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
        let addr = listener.local_addr()?;
        let router = app(state);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                #[allow(clippy::print_stderr)]
                {
                    eprintln!("test server on {addr} failed: {e}");
                }
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            pool,
            handle,
        })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_config() -> Result<ShopConfig, SpawnError> {
    Ok(ShopConfig {
        database_path: PathBuf::from(":memory:"),
        host: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        auth: AuthConfig {
            jwt_secret: SecretString::from(JWT_SECRET),
            token_ttl: TimeDelta::try_minutes(TOKEN_TTL_MINUTES).ok_or("ttl out of range")?,
        },
        admin_seed: AdminSeedConfig {
            username: Username::parse(ADMIN_USERNAME)?,
            password: SecretString::from(ADMIN_PASSWORD),
        },
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    })
}
