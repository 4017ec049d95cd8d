//! Postgres implementation of the catalog storage traits.

use async_trait::async_trait;
use domain::models::{BusinessId, Category, Product, SkillVideo};
use domain::store::{
    CatalogStore, CategoryChanges, CategoryStore, NewCategory, NewProduct, NewSkillVideo,
    ProductChanges, ProductListFilter, ProductStore, SkillVideoStore, StoreError, StoreResult,
    UniqueKey,
};
use sqlx::PgPool;
use tracing::error;

use crate::repositories::{CategoryRepository, ProductRepository, SkillVideoRepository};

/// PostgreSQL error code for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL error code for foreign_key_violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn unique_key_for(constraint: &str) -> Option<UniqueKey> {
    match constraint {
        "categories_category_id_key" => Some(UniqueKey::CategoryExternalId),
        "uq_categories_business_name" => Some(UniqueKey::CategoryName),
        "uq_categories_business_slug" => Some(UniqueKey::CategorySlug),
        "products_product_id_key" => Some(UniqueKey::ProductExternalId),
        _ => None,
    }
}

/// Maps a sqlx error onto the storage error the services understand.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                if let Some(key) = db_err.constraint().and_then(unique_key_for) {
                    return StoreError::UniqueViolation(key);
                }
            }
            Some(FOREIGN_KEY_VIOLATION) => return StoreError::ForeignKeyViolation,
            _ => {}
        }
    }
    error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// Catalog storage backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
    categories: CategoryRepository,
    products: ProductRepository,
    videos: SkillVideoRepository,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            videos: SkillVideoRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CategoryStore for PgCatalogStore {
    async fn category_id_exists(&self, category_id: i32) -> StoreResult<bool> {
        self.categories
            .category_id_exists(category_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_category(&self, record: NewCategory) -> StoreResult<Category> {
        self.categories
            .insert(&record)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn find_category(
        &self,
        business: BusinessId,
        category_id: i32,
    ) -> StoreResult<Option<Category>> {
        self.categories
            .find(business, category_id)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn list_active_categories(&self, business: BusinessId) -> StoreResult<Vec<Category>> {
        self.categories
            .list_active(business)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }

    async fn category_name_taken(
        &self,
        business: BusinessId,
        name: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool> {
        self.categories
            .name_taken(business, name, exclude_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn category_slug_taken(
        &self,
        business: BusinessId,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool> {
        self.categories
            .slug_taken(business, slug, exclude_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_category(
        &self,
        business: BusinessId,
        id: i64,
        changes: CategoryChanges,
    ) -> StoreResult<Option<Category>> {
        self.categories
            .update(business, id, &changes)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn delete_category(&self, business: BusinessId, id: i64) -> StoreResult<bool> {
        self.categories
            .delete(business, id)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ProductStore for PgCatalogStore {
    async fn product_id_exists(&self, product_id: i32) -> StoreResult<bool> {
        self.products
            .product_id_exists(product_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_product(&self, record: NewProduct) -> StoreResult<Product> {
        self.products
            .insert(&record)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn find_product(
        &self,
        business: BusinessId,
        product_id: i32,
    ) -> StoreResult<Option<Product>> {
        self.products
            .find(business, product_id)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn list_active_products(
        &self,
        business: BusinessId,
        filter: ProductListFilter,
    ) -> StoreResult<Vec<Product>> {
        self.products
            .list_active(business, filter)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }

    async fn update_product(
        &self,
        business: BusinessId,
        id: i64,
        changes: ProductChanges,
    ) -> StoreResult<Option<Product>> {
        self.products
            .update(business, id, &changes)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn delete_product(&self, business: BusinessId, id: i64) -> StoreResult<bool> {
        self.products
            .delete(business, id)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl SkillVideoStore for PgCatalogStore {
    async fn insert_skill_video(&self, record: NewSkillVideo) -> StoreResult<SkillVideo> {
        self.videos
            .insert(&record)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn find_skill_video(
        &self,
        business: BusinessId,
        id: i64,
    ) -> StoreResult<Option<SkillVideo>> {
        self.videos
            .find(business, id)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn list_business_skill_videos(
        &self,
        business: BusinessId,
    ) -> StoreResult<Vec<SkillVideo>> {
        self.videos
            .list_for_business(business)
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }

    async fn list_all_skill_videos(&self) -> StoreResult<Vec<SkillVideo>> {
        self.videos
            .list_all()
            .await
            .map(|rows| rows.into_iter().map(Into::into).collect())
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::metrics::record_pool_metrics(&self.pool);
        crate::db::ping(&self.pool).await.map_err(map_sqlx_error)
    }
}
