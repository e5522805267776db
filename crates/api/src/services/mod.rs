//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password hashing, access tokens, admin seeding and login

pub mod auth;

pub use auth::{AuthError, AuthService, SeedOutcome, TokenIssuer};
