//! Shop Ve Sinh Core - Shared types library.
//!
//! This crate provides the domain types used across the Shop Ve Sinh components:
//! - `api` - HTTP backend (catalog, dashboard, login)
//! - `cli` - Command-line tools for database setup and admin management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, catalog entities, partial updates, and dashboard stats

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
