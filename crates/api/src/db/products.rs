//! Product repository for database operations.
//!
//! Every method is one unit of work: single statements run on a pooled
//! connection, read-modify-write runs inside a transaction that rolls back
//! when dropped without commit.

use sqlx::SqlitePool;

use shop_ve_sinh_core::{NewProduct, Product, ProductId, ProductPatch};

use super::RepositoryError;

/// Hard upper bound on a single page of products.
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    category: Option<String>,
    image_url: Option<String>,
    in_stock: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            image_url: row.image_url,
            in_stock: row.in_stock,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, image_url, in_stock";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List products in insertion order.
    ///
    /// `limit` is clamped to [`MAX_PAGE_SIZE`]; `offset` has no upper bound.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, offset: u64, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        let limit = limit.min(MAX_PAGE_SIZE);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a product and return it with its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO product (name, description, price, category, image_url, in_stock)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.in_stock)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update and return the stored result.
    ///
    /// Fields absent from `patch` keep their current values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut product: Product = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?
        .into();

        if patch.is_empty() {
            return Ok(product);
        }

        patch.apply(&mut product);

        sqlx::query(
            r"
            UPDATE product
            SET name = ?, description = ?, price = ?, category = ?, image_url = ?, in_stock = ?
            WHERE id = ?
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.in_stock)
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM product")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shop_ve_sinh_core::Patch;

    use super::*;
    use crate::db::{create_memory_pool, ensure_schema};

    async fn test_pool() -> SqlitePool {
        let pool = create_memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn toilet() -> NewProduct {
        NewProduct {
            description: Some("Bồn cầu một khối men sứ".to_owned()),
            category: Some("Bồn cầu".to_owned()),
            image_url: Some("https://cdn.example.vn/bon-cau.jpg".to_owned()),
            ..NewProduct::new("Bồn cầu TOTO", 4_500_000.0)
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&toilet()).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched, toilet().into_product(created.id));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        assert!(repo.get(ProductId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_insertion_ordered_and_paginated() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        for i in 0..5 {
            repo.create(&NewProduct::new(format!("Vòi nước {i}"), 100_000.0))
                .await
                .unwrap();
        }

        let page = repo.list(1, 2).await.unwrap();
        let names: Vec<_> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Vòi nước 1", "Vòi nước 2"]);

        assert!(repo.list(10, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_clamps_limit() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        for i in 0..105 {
            repo.create(&NewProduct::new(format!("Phụ kiện {i}"), 10_000.0))
                .await
                .unwrap();
        }

        assert_eq!(repo.list(0, 1000).await.unwrap().len(), 100);
        assert_eq!(repo.list(0, u32::MAX).await.unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_list_past_the_end_is_empty() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        repo.create(&toilet()).await.unwrap();

        assert!(repo.list(u64::from(u32::MAX) + 1, 10).await.unwrap().is_empty());
        assert!(repo.list(u64::MAX, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_only_touches_present_fields() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let created = repo.create(&toilet()).await.unwrap();

        let patch = ProductPatch {
            price: Patch::Present(3_990_000.0),
            image_url: Patch::Present(None),
            ..ProductPatch::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap();

        assert_eq!(updated.price, 3_990_000.0);
        assert_eq!(updated.image_url, None);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);

        let stored = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let result = repo.update(ProductId::new(9), ProductPatch::default()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let created = repo.create(&toilet()).await.unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(repo.get(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(created.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_count_tracks_rows() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        assert_eq!(repo.count().await.unwrap(), 0);

        let created = repo.create(&toilet()).await.unwrap();
        repo.create(&NewProduct::new("Sen tắm", 2_000_000.0))
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);

        repo.delete(created.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
