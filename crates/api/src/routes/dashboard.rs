//! Admin dashboard handler.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use shop_ve_sinh_core::DashboardStats;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/admin/dashboard", get(stats))
}

/// Live product count; order and revenue figures are fixed placeholders.
#[instrument(skip(state))]
async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let total_products = ProductRepository::new(state.pool()).count().await?;
    Ok(Json(DashboardStats::with_product_count(total_products)))
}
