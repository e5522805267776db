//! Database setup commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli db init
//! shop-cli db init --path /var/lib/shop/database.db
//! ```

use std::path::Path;

use shop_ve_sinh_api::db::{self, RepositoryError};

/// Create the database file (and its directory) plus any missing tables.
///
/// Running it against an existing database leaves the data untouched.
pub async fn init(path: &Path) -> Result<(), RepositoryError> {
    tracing::info!(path = %path.display(), "Initializing database...");

    let pool = db::create_pool(path).await?;
    db::ensure_schema(&pool).await?;
    pool.close().await;

    tracing::info!("Database ready");
    Ok(())
}
