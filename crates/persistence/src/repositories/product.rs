//! Product repository for database operations.
//!
//! Rows are always returned joined with their category so callers see the
//! category's external id and name.

use domain::models::BusinessId;
use domain::store::{NewProduct, ProductChanges, ProductListFilter};
use sqlx::PgPool;

use crate::entities::ProductEntity;
use crate::metrics::QueryTimer;

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.product_id, p.business_id, c.category_id AS category, c.name AS category_name,
           p.name, p.description, p.price, p.image_url, p.is_active, p.is_feature,
           p.created_at, p.updated_at
"#;

/// Repository for product-related database operations.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn product_id_exists(&self, product_id: i32) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("product_id_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM products WHERE product_id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn insert(&self, record: &NewProduct) -> Result<ProductEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_product");
        let result = sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            WITH p AS (
                INSERT INTO products
                    (product_id, business_id, category_pk, name, description, price, image_url, is_active, is_feature)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
            )
            {PRODUCT_SELECT}
            FROM p JOIN categories c ON c.id = p.category_pk
            "#
        ))
        .bind(record.product_id)
        .bind(record.business_id.get())
        .bind(record.category_pk)
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.price)
        .bind(&record.image_url)
        .bind(record.is_active)
        .bind(record.is_feature)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a product by external id within a business.
    pub async fn find(
        &self,
        business: BusinessId,
        product_id: i32,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_product");
        let result = sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            {PRODUCT_SELECT}
            FROM products p JOIN categories c ON c.id = p.category_pk
            WHERE p.business_id = $1 AND p.product_id = $2
            "#
        ))
        .bind(business.get())
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Active products of a business, newest first.
    pub async fn list_active(
        &self,
        business: BusinessId,
        filter: ProductListFilter,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_products");
        let result = sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            {PRODUCT_SELECT}
            FROM products p JOIN categories c ON c.id = p.category_pk
            WHERE p.business_id = $1
              AND p.is_active = TRUE
              AND ($2 = FALSE OR p.is_feature = TRUE)
              AND ($3::BIGINT IS NULL OR p.category_pk = $3)
            ORDER BY p.created_at DESC, p.id DESC
            "#
        ))
        .bind(business.get())
        .bind(filter.featured_only)
        .bind(filter.category_pk)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Partial update; NULL parameters keep the stored value.
    pub async fn update(
        &self,
        business: BusinessId,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_product");
        let result = sqlx::query_as::<_, ProductEntity>(&format!(
            r#"
            WITH p AS (
                UPDATE products SET
                    category_pk = COALESCE($3, category_pk),
                    name = COALESCE($4, name),
                    description = COALESCE($5, description),
                    price = COALESCE($6, price),
                    image_url = COALESCE($7, image_url),
                    is_active = COALESCE($8, is_active),
                    is_feature = COALESCE($9, is_feature),
                    updated_at = NOW()
                WHERE id = $1 AND business_id = $2
                RETURNING *
            )
            {PRODUCT_SELECT}
            FROM p JOIN categories c ON c.id = p.category_pk
            "#
        ))
        .bind(id)
        .bind(business.get())
        .bind(changes.category_pk)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(&changes.image_url)
        .bind(changes.is_active)
        .bind(changes.is_feature)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn delete(&self, business: BusinessId, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_product");
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND business_id = $2")
            .bind(id)
            .bind(business.get())
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected() > 0)
    }
}
