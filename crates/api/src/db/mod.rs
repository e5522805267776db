//! Persistence gateway for the shop's SQLite database.
//!
//! # Database: single SQLite file (default `db/database.db`)
//!
//! ## Tables
//!
//! - `product` - Catalog items
//! - `adminuser` - Admin accounts (username + password hash)
//!
//! # Schema
//!
//! Tables are created on startup with `CREATE ... IF NOT EXISTS`. There is no
//! migration step; changing a column requires rebuilding the file. The table
//! and index names match the files written by earlier deployments.
//!
//! ```bash
//! shop-cli db init --path db/database.db
//! ```

pub mod admin_users;
pub mod products;

use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The database directory could not be prepared.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS product (
        id INTEGER NOT NULL PRIMARY KEY,
        name VARCHAR NOT NULL,
        description VARCHAR,
        price FLOAT NOT NULL,
        category VARCHAR,
        image_url VARCHAR,
        in_stock BOOLEAN NOT NULL DEFAULT 1
    )
    ",
    "CREATE INDEX IF NOT EXISTS ix_product_name ON product (name)",
    r"
    CREATE TABLE IF NOT EXISTS adminuser (
        id INTEGER NOT NULL PRIMARY KEY,
        username VARCHAR NOT NULL,
        hashed_password VARCHAR NOT NULL
    )
    ",
    "CREATE UNIQUE INDEX IF NOT EXISTS ix_adminuser_username ON adminuser (username)",
];

/// Open (creating if needed) the SQLite database file at `path`.
///
/// The parent directory is created when missing.
///
/// # Errors
///
/// Returns `RepositoryError::Storage` if the directory cannot be created and
/// `RepositoryError::Database` if the file cannot be opened.
pub async fn create_pool(path: &Path) -> Result<SqlitePool, RepositoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open a private in-memory database.
///
/// The pool holds exactly one connection that is never recycled, because
/// every SQLite in-memory connection is its own database.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the connection cannot be opened.
pub async fn create_memory_pool() -> Result<SqlitePool, RepositoryError> {
    let options: SqliteConnectOptions = "sqlite::memory:".parse()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create every table and index that does not exist yet.
///
/// Safe to call on every startup.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a statement fails.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(*statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::debug!(tables = 2, "database schema ensured");
    Ok(())
}

/// Map a unique-constraint failure to `Conflict`, everything else to `Database`.
fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_schema_creates_tables() {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();

        assert_eq!(table_names(&pool).await, vec!["adminuser", "product"]);
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        assert_eq!(table_names(&pool).await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_pool_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db").join("database.db");

        let pool = create_pool(&path).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool.close().await;

        assert!(path.exists());
    }
}
