//! Shop Ve Sinh backend library.
//!
//! The HTTP API for a bathroom-fixtures shop: a product catalog over SQLite,
//! a placeholder admin dashboard, and password login issuing bearer tokens.
//! Exposed as a library so the binary, the CLI, and the integration tests
//! share one router and one persistence layer.
//!
//! # Security
//!
//! Product mutations and the dashboard are NOT protected. Tokens are issued
//! but never required; see [`middleware::auth`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ShopConfig;
pub use error::AppError;
pub use routes::app;
pub use state::AppState;
