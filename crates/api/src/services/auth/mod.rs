//! Authentication service.
//!
//! Password login for the admin account, issuing HS256 bearer tokens.
//! Issued tokens are not checked by any route; see
//! [`crate::middleware::auth::UnverifiedBearerToken`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use shop_ve_sinh_core::Username;

use crate::config::{AdminSeedConfig, AuthConfig};
use crate::db::RepositoryError;
use crate::db::admin_users::AdminUserRepository;
use crate::models::admin_user::AdminUser;

/// Token type reported alongside every access token.
pub const BEARER_TOKEN_TYPE: &str = "bearer";

// =============================================================================
// Tokens
// =============================================================================

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Admin username.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Signs time-limited access tokens.
///
/// Implements `Debug` manually to keep the signing key out of logs.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: TimeDelta,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("encoding_key", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Create an issuer signing with `secret` (HS256).
    #[must_use]
    pub fn new(secret: &SecretString, ttl: TimeDelta) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            ttl,
        }
    }

    /// Create an issuer from the auth configuration.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl)
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue(&self, subject: &Username) -> Result<AccessToken, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    fn issue_at(&self, subject: &Username, now: DateTime<Utc>) -> Result<AccessToken, AuthError> {
        let claims = AccessClaims {
            sub: subject.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(AccessToken {
            access_token: token,
            token_type: BEARER_TOKEN_TYPE.to_owned(),
        })
    }
}

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// A hash that cannot be parsed never verifies.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Service
// =============================================================================

/// Result of ensuring the seed admin account exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The account was missing and has been created.
    Created(AdminUser),
    /// An account with that username was already present; nothing changed.
    AlreadyExists,
}

/// Authentication service.
///
/// Handles admin seeding and password login.
pub struct AuthService<'a> {
    users: AdminUserRepository<'a>,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, tokens: &'a TokenIssuer) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
            tokens,
        }
    }

    /// Check credentials and issue an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password does not match.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let Ok(username) = Username::parse(username) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .users
            .get_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.hashed_password) {
            return Err(AuthError::InvalidCredentials);
        }

        self.tokens.issue(&user.username)
    }

    /// Create the admin account unless one with `username` already exists.
    ///
    /// An existing account is left untouched, including its password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn ensure_admin(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<SeedOutcome, AuthError> {
        if self.users.get_by_username(username).await?.is_some() {
            return Ok(SeedOutcome::AlreadyExists);
        }

        match self.create_admin(username, password).await {
            Ok(user) => Ok(SeedOutcome::Created(user)),
            // Another process seeded between lookup and insert
            Err(AuthError::UserAlreadyExists) => Ok(SeedOutcome::AlreadyExists),
            Err(e) => Err(e),
        }
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` for other database errors.
    pub async fn create_admin(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<AdminUser, AuthError> {
        let hashed_password = hash_password(password.expose_secret())?;

        self.users
            .create(username, &hashed_password)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }
}

/// Ensure the configured admin account exists, logging the outcome.
///
/// # Errors
///
/// Returns `AuthError` if hashing or the database operation fails.
pub async fn seed_admin(
    pool: &SqlitePool,
    tokens: &TokenIssuer,
    seed: &AdminSeedConfig,
) -> Result<SeedOutcome, AuthError> {
    let outcome = AuthService::new(pool, tokens)
        .ensure_admin(&seed.username, &seed.password)
        .await?;

    match &outcome {
        SeedOutcome::Created(user) => {
            tracing::info!(username = %user.username, "admin account created");
            if seed.uses_default_password() {
                tracing::warn!(
                    username = %user.username,
                    "admin account uses the default password; set ADMIN_PASSWORD"
                );
            }
        }
        SeedOutcome::AlreadyExists => {
            tracing::debug!(username = %seed.username, "admin account already present");
        }
    }

    Ok(outcome)
}
