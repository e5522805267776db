//! Admin user domain types.

use shop_ve_sinh_core::{AdminUserId, Username};

/// An admin account (domain type).
///
/// Not serializable: the password hash must never be sent to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name.
    pub username: Username,
    /// Argon2 PHC string.
    pub hashed_password: String,
}
