//! Storage seams for the catalog.
//!
//! Every tenant-scoped method takes the caller's [`BusinessId`] as a required
//! argument. Implementations filter on it for reads and stamp it on writes, so
//! a row owned by another business is indistinguishable from a missing one.
//!
//! External ids (`category_id`, `product_id`) are globally unique and looked up
//! without a tenant only by the id minting pre-check.

pub mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{BusinessId, Category, Product, SkillVideo};

pub use memory::InMemoryCatalogStore;

/// Unique constraints the catalog relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    CategoryExternalId,
    CategoryName,
    CategorySlug,
    ProductExternalId,
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0:?}")]
    UniqueViolation(UniqueKey),

    #[error("Referenced row does not exist")]
    ForeignKeyViolation,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Insert record for a category. The business id is always the caller's.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub category_id: i32,
    pub business_id: BusinessId,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Partial category update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_id: i32,
    pub business_id: BusinessId,
    /// Internal id of a category already resolved within `business_id`.
    pub category_pk: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_feature: bool,
}

/// Partial product update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub category_pk: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_feature: Option<bool>,
}

/// Extra predicates for active product listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListFilter {
    pub featured_only: bool,
    pub category_pk: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewSkillVideo {
    pub business_id: BusinessId,
    pub title: String,
    pub description: Option<String>,
    pub youtube_url: String,
    pub youtube_video_id: String,
    pub is_locked: bool,
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Global existence check used while minting external ids.
    async fn category_id_exists(&self, category_id: i32) -> StoreResult<bool>;

    async fn insert_category(&self, record: NewCategory) -> StoreResult<Category>;

    async fn find_category(
        &self,
        business: BusinessId,
        category_id: i32,
    ) -> StoreResult<Option<Category>>;

    /// Active categories of the business, newest first.
    async fn list_active_categories(&self, business: BusinessId) -> StoreResult<Vec<Category>>;

    async fn category_name_taken(
        &self,
        business: BusinessId,
        name: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool>;

    async fn category_slug_taken(
        &self,
        business: BusinessId,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool>;

    async fn update_category(
        &self,
        business: BusinessId,
        id: i64,
        changes: CategoryChanges,
    ) -> StoreResult<Option<Category>>;

    /// Removes the category and every product filed under it.
    async fn delete_category(&self, business: BusinessId, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn product_id_exists(&self, product_id: i32) -> StoreResult<bool>;

    async fn insert_product(&self, record: NewProduct) -> StoreResult<Product>;

    async fn find_product(
        &self,
        business: BusinessId,
        product_id: i32,
    ) -> StoreResult<Option<Product>>;

    /// Active products of the business matching `filter`, newest first.
    async fn list_active_products(
        &self,
        business: BusinessId,
        filter: ProductListFilter,
    ) -> StoreResult<Vec<Product>>;

    async fn update_product(
        &self,
        business: BusinessId,
        id: i64,
        changes: ProductChanges,
    ) -> StoreResult<Option<Product>>;

    async fn delete_product(&self, business: BusinessId, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait SkillVideoStore: Send + Sync {
    async fn insert_skill_video(&self, record: NewSkillVideo) -> StoreResult<SkillVideo>;

    async fn find_skill_video(
        &self,
        business: BusinessId,
        id: i64,
    ) -> StoreResult<Option<SkillVideo>>;

    /// Videos of one business, newest first.
    async fn list_business_skill_videos(&self, business: BusinessId)
        -> StoreResult<Vec<SkillVideo>>;

    /// Videos of every business, newest first.
    async fn list_all_skill_videos(&self) -> StoreResult<Vec<SkillVideo>>;
}

/// The full storage surface the application runs against.
#[async_trait]
pub trait CatalogStore: CategoryStore + ProductStore + SkillVideoStore {
    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> StoreResult<()>;
}

