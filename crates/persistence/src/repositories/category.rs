//! Category repository for database operations.

use domain::models::BusinessId;
use domain::store::{CategoryChanges, NewCategory};
use sqlx::PgPool;

use crate::entities::CategoryEntity;
use crate::metrics::QueryTimer;

const CATEGORY_COLUMNS: &str =
    "id, category_id, business_id, name, slug, image_url, description, is_active, created_at, updated_at";

/// Repository for category-related database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Checks whether an external id is in use by any business.
    pub async fn category_id_exists(&self, category_id: i32) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("category_id_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn insert(&self, record: &NewCategory) -> Result<CategoryEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_category");
        let result = sqlx::query_as::<_, CategoryEntity>(&format!(
            r#"
            INSERT INTO categories (category_id, business_id, name, slug, image_url, description, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(record.category_id)
        .bind(record.business_id.get())
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.image_url)
        .bind(&record.description)
        .bind(record.is_active)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a category by external id within a business.
    pub async fn find(
        &self,
        business: BusinessId,
        category_id: i32,
    ) -> Result<Option<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_category");
        let result = sqlx::query_as::<_, CategoryEntity>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE business_id = $1 AND category_id = $2"
        ))
        .bind(business.get())
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Active categories of a business, newest first.
    pub async fn list_active(&self, business: BusinessId) -> Result<Vec<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_categories");
        let result = sqlx::query_as::<_, CategoryEntity>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM categories
            WHERE business_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(business.get())
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn name_taken(
        &self,
        business: BusinessId,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("category_name_taken");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE business_id = $1 AND name = $2 AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(business.get())
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn slug_taken(
        &self,
        business: BusinessId,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("category_slug_taken");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE business_id = $1 AND slug = $2 AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(business.get())
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Partial update; NULL parameters keep the stored value.
    pub async fn update(
        &self,
        business: BusinessId,
        id: i64,
        changes: &CategoryChanges,
    ) -> Result<Option<CategoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_category");
        let result = sqlx::query_as::<_, CategoryEntity>(&format!(
            r#"
            UPDATE categories SET
                name = COALESCE($3, name),
                slug = COALESCE($4, slug),
                image_url = COALESCE($5, image_url),
                description = COALESCE($6, description),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(business.get())
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(&changes.image_url)
        .bind(&changes.description)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Deletes a category; its products go with it through the cascading key.
    pub async fn delete(&self, business: BusinessId, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_category");
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND business_id = $2")
            .bind(id)
            .bind(business.get())
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected() > 0)
    }
}
