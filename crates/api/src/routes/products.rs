//! Product catalog handlers.
//!
//! None of these require authentication.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shop_ve_sinh_core::{NewProduct, Product, ProductId, ProductPatch};

use crate::db::products::MAX_PAGE_SIZE;
use crate::db::{ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "Product not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/", get(list).post(create))
        .route(
            "/api/products/{id}",
            get(show).patch(update).delete(destroy),
        )
}

/// Pagination for the product listing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn default_limit() -> u32 {
    MAX_PAGE_SIZE
}

/// Body of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub ok: bool,
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()),
        other => other.into(),
    }
}

/// List products in insertion order.
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool())
        .list(query.offset, query.limit)
        .await?;
    Ok(Json(products))
}

/// Fetch one product.
#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
) -> Result<Json<Product>, AppError> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()))
}

/// Create a product; the database assigns the id.
#[instrument(skip(state, new_product), fields(name = %new_product.name))]
async fn create(
    State(state): State<AppState>,
    AppJson(new_product): AppJson<NewProduct>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .create(&new_product)
        .await?;
    tracing::info!(product_id = %product.id, "product created");
    Ok(Json(product))
}

/// Apply the fields present in the body; absent fields are untouched.
#[instrument(skip(state, patch))]
async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
    AppJson(patch): AppJson<ProductPatch>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .update(id, patch)
        .await
        .map_err(not_found)?;
    Ok(Json(product))
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
) -> Result<Json<Deleted>, AppError> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found)?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(Deleted { ok: true }))
}
