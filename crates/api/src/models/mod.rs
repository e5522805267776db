//! Domain models for the shop backend.
//!
//! Catalog types live in `shop_ve_sinh_core`; this module holds the types
//! that carry credentials and never leave the server.

pub mod admin_user;

pub use admin_user::AdminUser;
