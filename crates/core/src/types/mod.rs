//! Core types for Shop Ve Sinh.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod dashboard;
pub mod id;
pub mod patch;
pub mod product;
pub mod username;

pub use dashboard::{
    DashboardStats, HEALTHY_STATUS, PLACEHOLDER_ORDER_COUNT, PLACEHOLDER_REVENUE,
};
pub use id::*;
pub use patch::Patch;
pub use product::{NewProduct, Product, ProductPatch};
pub use username::{Username, UsernameError};
