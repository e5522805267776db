//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli admin create -u owner -p 'a-strong-password'
//! ADMIN_PASSWORD='a-strong-password' shop-cli admin create -u owner
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_PATH` - SQLite database file (default: db/database.db)
//! - `ADMIN_PASSWORD` - Password when `-p` is not given

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use shop_ve_sinh_api::db::{self, AdminUserRepository, RepositoryError};
use shop_ve_sinh_api::services::auth::{AuthError, hash_password};
use shop_ve_sinh_core::{AdminUserId, Username};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Empty password.
    #[error("Password cannot be empty")]
    EmptyPassword,

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),

    /// User already exists.
    #[error("Admin user already exists: {0}")]
    UserExists(String),
}

/// Create a new admin account.
///
/// Tables are created first if the database is new.
///
/// # Returns
///
/// The ID of the created admin account.
pub async fn create_user(
    path: &Path,
    username: &str,
    password: &SecretString,
) -> Result<AdminUserId, AdminError> {
    let username =
        Username::parse(username).map_err(|e| AdminError::InvalidUsername(e.to_string()))?;
    if password.expose_secret().is_empty() {
        return Err(AdminError::EmptyPassword);
    }

    tracing::info!(path = %path.display(), "Connecting to database...");
    let pool = db::create_pool(path).await?;
    db::ensure_schema(&pool).await?;

    tracing::info!("Creating admin user: {}", username);
    let hashed_password = hash_password(password.expose_secret())?;
    let result = AdminUserRepository::new(&pool)
        .create(&username, &hashed_password)
        .await;
    pool.close().await;

    match result {
        Ok(user) => Ok(user.id),
        Err(RepositoryError::Conflict(_)) => Err(AdminError::UserExists(username.into_inner())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_user_then_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.db");
        let password = SecretString::from("Kh0ng-d0an-duoc!");

        create_user(&path, "owner", &password).await.unwrap();
        let second = create_user(&path, "owner", &password).await;

        assert!(matches!(second, Err(AdminError::UserExists(ref name)) if name == "owner"));
    }

    #[tokio::test]
    async fn test_create_user_validates_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.db");

        let bad_name = create_user(&path, "has space", &SecretString::from("pw")).await;
        assert!(matches!(bad_name, Err(AdminError::InvalidUsername(_))));

        let empty = create_user(&path, "owner", &SecretString::from("")).await;
        assert!(matches!(empty, Err(AdminError::EmptyPassword)));
    }
}
