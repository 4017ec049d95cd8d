//! In-memory [`CatalogStore`] used by tests and local development.
//!
//! Enforces the same unique and ownership constraints as the Postgres schema:
//! global external ids, per-business category names and slugs, products bound
//! to a category of the same business, and cascading category deletes.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{
    CatalogStore, CategoryChanges, CategoryStore, NewCategory, NewProduct, NewSkillVideo,
    ProductChanges, ProductListFilter, ProductStore, SkillVideoStore, StoreError, StoreResult,
    UniqueKey,
};
use crate::models::{BusinessId, Category, Product, SkillVideo};

#[derive(Debug, Clone)]
struct ProductRow {
    id: i64,
    product_id: i32,
    business_id: BusinessId,
    category_pk: i64,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
    is_active: bool,
    is_feature: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    categories: Vec<Category>,
    products: Vec<ProductRow>,
    videos: Vec<SkillVideo>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn category_by_pk(&self, business: BusinessId, id: i64) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id && c.business_id == business)
    }

    fn name_taken(&self, business: BusinessId, name: &str, exclude_id: Option<i64>) -> bool {
        self.categories.iter().any(|c| {
            c.business_id == business && c.name == name && Some(c.id) != exclude_id
        })
    }

    fn slug_taken(&self, business: BusinessId, slug: &str, exclude_id: Option<i64>) -> bool {
        self.categories.iter().any(|c| {
            c.business_id == business && c.slug == slug && Some(c.id) != exclude_id
        })
    }

    fn hydrate(&self, row: &ProductRow) -> StoreResult<Product> {
        let category = self
            .category_by_pk(row.business_id, row.category_pk)
            .ok_or(StoreError::ForeignKeyViolation)?;

        Ok(Product {
            id: row.id,
            product_id: row.product_id,
            business_id: row.business_id,
            category: category.category_id,
            category_name: category.name.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            price: row.price,
            image_url: row.image_url.clone(),
            is_active: row.is_active,
            is_feature: row.is_feature,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn newest_first(a: (DateTime<Utc>, i64), b: (DateTime<Utc>, i64)) -> Ordering {
    b.0.cmp(&a.0).then(b.1.cmp(&a.1))
}

/// Process-local catalog storage.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    state: RwLock<State>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCatalogStore {
    async fn category_id_exists(&self, category_id: i32) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .any(|c| c.category_id == category_id))
    }

    async fn insert_category(&self, record: NewCategory) -> StoreResult<Category> {
        let mut state = self.state.write().await;

        if state
            .categories
            .iter()
            .any(|c| c.category_id == record.category_id)
        {
            return Err(StoreError::UniqueViolation(UniqueKey::CategoryExternalId));
        }
        if state.name_taken(record.business_id, &record.name, None) {
            return Err(StoreError::UniqueViolation(UniqueKey::CategoryName));
        }
        if state.slug_taken(record.business_id, &record.slug, None) {
            return Err(StoreError::UniqueViolation(UniqueKey::CategorySlug));
        }

        let now = Utc::now();
        let category = Category {
            id: state.next_id(),
            category_id: record.category_id,
            business_id: record.business_id,
            name: record.name,
            slug: record.slug,
            image_url: record.image_url,
            description: record.description,
            is_active: record.is_active,
            created_at: now,
            updated_at: now,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn find_category(
        &self,
        business: BusinessId,
        category_id: i32,
    ) -> StoreResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .find(|c| c.business_id == business && c.category_id == category_id)
            .cloned())
    }

    async fn list_active_categories(&self, business: BusinessId) -> StoreResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.business_id == business && c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        Ok(categories)
    }

    async fn category_name_taken(
        &self,
        business: BusinessId,
        name: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool> {
        Ok(self.state.read().await.name_taken(business, name, exclude_id))
    }

    async fn category_slug_taken(
        &self,
        business: BusinessId,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool> {
        Ok(self.state.read().await.slug_taken(business, slug, exclude_id))
    }

    async fn update_category(
        &self,
        business: BusinessId,
        id: i64,
        changes: CategoryChanges,
    ) -> StoreResult<Option<Category>> {
        let mut state = self.state.write().await;

        if state.category_by_pk(business, id).is_none() {
            return Ok(None);
        }
        if let Some(name) = &changes.name {
            if state.name_taken(business, name, Some(id)) {
                return Err(StoreError::UniqueViolation(UniqueKey::CategoryName));
            }
        }
        if let Some(slug) = &changes.slug {
            if state.slug_taken(business, slug, Some(id)) {
                return Err(StoreError::UniqueViolation(UniqueKey::CategorySlug));
            }
        }

        let Some(category) = state
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.business_id == business)
        else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(slug) = changes.slug {
            category.slug = slug;
        }
        if changes.image_url.is_some() {
            category.image_url = changes.image_url;
        }
        if changes.description.is_some() {
            category.description = changes.description;
        }
        if let Some(is_active) = changes.is_active {
            category.is_active = is_active;
        }
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, business: BusinessId, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.categories.len();
        state
            .categories
            .retain(|c| !(c.id == id && c.business_id == business));
        if state.categories.len() == before {
            return Ok(false);
        }
        state.products.retain(|p| p.category_pk != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductStore for InMemoryCatalogStore {
    async fn product_id_exists(&self, product_id: i32) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state.products.iter().any(|p| p.product_id == product_id))
    }

    async fn insert_product(&self, record: NewProduct) -> StoreResult<Product> {
        let mut state = self.state.write().await;

        if state
            .products
            .iter()
            .any(|p| p.product_id == record.product_id)
        {
            return Err(StoreError::UniqueViolation(UniqueKey::ProductExternalId));
        }
        if state
            .category_by_pk(record.business_id, record.category_pk)
            .is_none()
        {
            return Err(StoreError::ForeignKeyViolation);
        }

        let now = Utc::now();
        let row = ProductRow {
            id: state.next_id(),
            product_id: record.product_id,
            business_id: record.business_id,
            category_pk: record.category_pk,
            name: record.name,
            description: record.description,
            price: record.price,
            image_url: record.image_url,
            is_active: record.is_active,
            is_feature: record.is_feature,
            created_at: now,
            updated_at: now,
        };
        let product = state.hydrate(&row)?;
        state.products.push(row);
        Ok(product)
    }

    async fn find_product(
        &self,
        business: BusinessId,
        product_id: i32,
    ) -> StoreResult<Option<Product>> {
        let state = self.state.read().await;
        state
            .products
            .iter()
            .find(|p| p.business_id == business && p.product_id == product_id)
            .map(|row| state.hydrate(row))
            .transpose()
    }

    async fn list_active_products(
        &self,
        business: BusinessId,
        filter: ProductListFilter,
    ) -> StoreResult<Vec<Product>> {
        let state = self.state.read().await;
        let mut rows: Vec<&ProductRow> = state
            .products
            .iter()
            .filter(|p| p.business_id == business && p.is_active)
            .filter(|p| !filter.featured_only || p.is_feature)
            .filter(|p| filter.category_pk.map_or(true, |pk| p.category_pk == pk))
            .collect();
        rows.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        rows.into_iter().map(|row| state.hydrate(row)).collect()
    }

    async fn update_product(
        &self,
        business: BusinessId,
        id: i64,
        changes: ProductChanges,
    ) -> StoreResult<Option<Product>> {
        let mut state = self.state.write().await;

        if let Some(category_pk) = changes.category_pk {
            if state.category_by_pk(business, category_pk).is_none() {
                return Err(StoreError::ForeignKeyViolation);
            }
        }

        let Some(row) = state
            .products
            .iter_mut()
            .find(|p| p.id == id && p.business_id == business)
        else {
            return Ok(None);
        };
        if let Some(category_pk) = changes.category_pk {
            row.category_pk = category_pk;
        }
        if let Some(name) = changes.name {
            row.name = name;
        }
        if changes.description.is_some() {
            row.description = changes.description;
        }
        if let Some(price) = changes.price {
            row.price = price;
        }
        if changes.image_url.is_some() {
            row.image_url = changes.image_url;
        }
        if let Some(is_active) = changes.is_active {
            row.is_active = is_active;
        }
        if let Some(is_feature) = changes.is_feature {
            row.is_feature = is_feature;
        }
        row.updated_at = Utc::now();

        let row = row.clone();
        state.hydrate(&row).map(Some)
    }

    async fn delete_product(&self, business: BusinessId, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.products.len();
        state
            .products
            .retain(|p| !(p.id == id && p.business_id == business));
        Ok(state.products.len() != before)
    }
}

#[async_trait]
impl SkillVideoStore for InMemoryCatalogStore {
    async fn insert_skill_video(&self, record: NewSkillVideo) -> StoreResult<SkillVideo> {
        let mut state = self.state.write().await;
        let video = SkillVideo {
            id: state.next_id(),
            business_id: record.business_id,
            title: record.title,
            description: record.description,
            youtube_url: record.youtube_url,
            youtube_video_id: record.youtube_video_id,
            is_locked: record.is_locked,
            created_at: Utc::now(),
        };
        state.videos.push(video.clone());
        Ok(video)
    }

    async fn find_skill_video(
        &self,
        business: BusinessId,
        id: i64,
    ) -> StoreResult<Option<SkillVideo>> {
        let state = self.state.read().await;
        Ok(state
            .videos
            .iter()
            .find(|v| v.id == id && v.business_id == business)
            .cloned())
    }

    async fn list_business_skill_videos(
        &self,
        business: BusinessId,
    ) -> StoreResult<Vec<SkillVideo>> {
        let state = self.state.read().await;
        let mut videos: Vec<SkillVideo> = state
            .videos
            .iter()
            .filter(|v| v.business_id == business)
            .cloned()
            .collect();
        videos.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        Ok(videos)
    }

    async fn list_all_skill_videos(&self) -> StoreResult<Vec<SkillVideo>> {
        let state = self.state.read().await;
        let mut videos = state.videos.clone();
        videos.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        Ok(videos)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
