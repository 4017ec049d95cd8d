//! Tenant-scoped category and product operations.
//!
//! The caller's [`BusinessId`] is a required argument to every operation. It
//! is stamped on created rows and used as the filter for every lookup, so an
//! id owned by another business behaves exactly like a missing id.

use std::sync::Arc;

use tracing::info;
use validator::{Validate, ValidationErrors};

use crate::error::{
    push_field_error, CatalogError, CatalogResult, DUPLICATE_NAME_MESSAGE, DUPLICATE_SLUG_MESSAGE,
};
use crate::models::category::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::product::{CategoryProductsResponse, CreateProductRequest, UpdateProductRequest};
use crate::models::{BusinessId, Category, Product};
use crate::services::id_mint::{mint_unique, IdSpace};
use crate::store::{
    CatalogStore, CategoryChanges, NewCategory, NewProduct, ProductChanges, ProductListFilter,
    UniqueKey,
};

fn collected(errors: ValidationErrors) -> CatalogResult<()> {
    if errors.field_errors().is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(errors))
    }
}

fn validation_errors<T: Validate>(request: &T) -> ValidationErrors {
    request.validate().err().unwrap_or_else(ValidationErrors::new)
}

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CatalogStore>,
    mint_max_attempts: u32,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CatalogStore>, mint_max_attempts: u32) -> Self {
        Self {
            store,
            mint_max_attempts,
        }
    }

    pub async fn list(&self, business: BusinessId) -> CatalogResult<Vec<Category>> {
        Ok(self.store.list_active_categories(business).await?)
    }

    pub async fn get(&self, business: BusinessId, category_id: i32) -> CatalogResult<Category> {
        self.store
            .find_category(business, category_id)
            .await?
            .ok_or(CatalogError::NotFound("Category"))
    }

    /// Creates a category with a freshly minted external id.
    pub async fn create(
        &self,
        business: BusinessId,
        request: CreateCategoryRequest,
    ) -> CatalogResult<Category> {
        let request = request.trimmed();
        let mut errors = validation_errors(&request);
        self.check_unique(
            business,
            request.name.as_deref(),
            request.slug.as_deref(),
            None,
            &mut errors,
        )
        .await?;
        collected(errors)?;

        let record = NewCategory {
            category_id: 0,
            business_id: business,
            name: request.name.unwrap_or_default(),
            slug: request.slug.unwrap_or_default(),
            image_url: request.image_url,
            description: request.description,
            is_active: request.is_active.unwrap_or(true),
        };

        let store = self.store.clone();
        let category = mint_unique(
            IdSpace::CATEGORY,
            UniqueKey::CategoryExternalId,
            self.mint_max_attempts,
            |id| {
                let store = store.clone();
                let record = NewCategory {
                    category_id: id,
                    ..record.clone()
                };
                async move {
                    if store.category_id_exists(id).await? {
                        return Ok(None);
                    }
                    store.insert_category(record).await.map(Some)
                }
            },
        )
        .await?;

        info!(
            business_id = %business,
            category_id = category.category_id,
            "Category created"
        );
        Ok(category)
    }

    /// Applies a partial update. Name and slug stay unique within the business.
    pub async fn update(
        &self,
        business: BusinessId,
        category_id: i32,
        request: UpdateCategoryRequest,
    ) -> CatalogResult<Category> {
        let existing = self.get(business, category_id).await?;

        let request = request.trimmed();
        let mut errors = validation_errors(&request);
        self.check_unique(
            business,
            request.name.as_deref(),
            request.slug.as_deref(),
            Some(existing.id),
            &mut errors,
        )
        .await?;
        collected(errors)?;

        let changes = CategoryChanges {
            name: request.name,
            slug: request.slug,
            image_url: request.image_url,
            description: request.description,
            is_active: request.is_active,
        };

        let category = self
            .store
            .update_category(business, existing.id, changes)
            .await?
            .ok_or(CatalogError::NotFound("Category"))?;

        info!(business_id = %business, category_id, "Category updated");
        Ok(category)
    }

    /// Hard delete. Products filed under the category go with it.
    pub async fn delete(&self, business: BusinessId, category_id: i32) -> CatalogResult<()> {
        let existing = self.get(business, category_id).await?;
        if !self.store.delete_category(business, existing.id).await? {
            return Err(CatalogError::NotFound("Category"));
        }
        info!(business_id = %business, category_id, "Category deleted");
        Ok(())
    }

    /// Active products of one of the caller's categories.
    pub async fn products(
        &self,
        business: BusinessId,
        category_id: i32,
    ) -> CatalogResult<CategoryProductsResponse> {
        let category = self.get(business, category_id).await?;
        let filter = ProductListFilter {
            featured_only: false,
            category_pk: Some(category.id),
        };
        let products = self.store.list_active_products(business, filter).await?;
        Ok(CategoryProductsResponse::new(
            category.category_id,
            category.name,
            products,
        ))
    }

    /// Adds name/slug conflict errors for fields that are otherwise valid.
    async fn check_unique(
        &self,
        business: BusinessId,
        name: Option<&str>,
        slug: Option<&str>,
        exclude_id: Option<i64>,
        errors: &mut ValidationErrors,
    ) -> CatalogResult<()> {
        let (check_name, check_slug) = {
            let invalid = errors.field_errors();
            (
                name.filter(|_| !invalid.contains_key("name")),
                slug.filter(|_| !invalid.contains_key("slug")),
            )
        };

        if let Some(name) = check_name {
            if self
                .store
                .category_name_taken(business, name, exclude_id)
                .await?
            {
                push_field_error(errors, "name", "unique", DUPLICATE_NAME_MESSAGE);
            }
        }
        if let Some(slug) = check_slug {
            if self
                .store
                .category_slug_taken(business, slug, exclude_id)
                .await?
            {
                push_field_error(errors, "slug", "unique", DUPLICATE_SLUG_MESSAGE);
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn CatalogStore>,
    mint_max_attempts: u32,
}

impl ProductService {
    pub fn new(store: Arc<dyn CatalogStore>, mint_max_attempts: u32) -> Self {
        Self {
            store,
            mint_max_attempts,
        }
    }

    pub async fn list(&self, business: BusinessId) -> CatalogResult<Vec<Product>> {
        Ok(self
            .store
            .list_active_products(business, ProductListFilter::default())
            .await?)
    }

    pub async fn featured(&self, business: BusinessId) -> CatalogResult<Vec<Product>> {
        let filter = ProductListFilter {
            featured_only: true,
            category_pk: None,
        };
        Ok(self.store.list_active_products(business, filter).await?)
    }

    pub async fn get(&self, business: BusinessId, product_id: i32) -> CatalogResult<Product> {
        self.store
            .find_product(business, product_id)
            .await?
            .ok_or(CatalogError::NotFound("Product"))
    }

    /// Creates a product under one of the caller's categories.
    pub async fn create(
        &self,
        business: BusinessId,
        request: CreateProductRequest,
    ) -> CatalogResult<Product> {
        let request = request.trimmed();
        request.validate_all()?;

        let category_pk = self
            .resolve_category(business, request.category.unwrap_or_default())
            .await?;

        let record = NewProduct {
            product_id: 0,
            business_id: business,
            category_pk,
            name: request.name.unwrap_or_default(),
            description: request.description,
            price: shared::validation::normalize_price(request.price.unwrap_or_default()),
            image_url: request.image_url,
            is_active: request.is_active.unwrap_or(true),
            is_feature: request.is_feature.unwrap_or(false),
        };

        let store = self.store.clone();
        let product = mint_unique(
            IdSpace::PRODUCT,
            UniqueKey::ProductExternalId,
            self.mint_max_attempts,
            |id| {
                let store = store.clone();
                let record = NewProduct {
                    product_id: id,
                    ..record.clone()
                };
                async move {
                    if store.product_id_exists(id).await? {
                        return Ok(None);
                    }
                    store.insert_product(record).await.map(Some)
                }
            },
        )
        .await?;

        info!(
            business_id = %business,
            product_id = product.product_id,
            category_id = product.category,
            "Product created"
        );
        Ok(product)
    }

    /// Full update: the create-time required fields must all be present.
    pub async fn replace(
        &self,
        business: BusinessId,
        product_id: i32,
        request: CreateProductRequest,
    ) -> CatalogResult<Product> {
        let existing = self.get(business, product_id).await?;
        let request = request.trimmed();
        request.validate_all()?;
        self.apply(business, existing, request.into()).await
    }

    /// Partial update.
    pub async fn update(
        &self,
        business: BusinessId,
        product_id: i32,
        request: UpdateProductRequest,
    ) -> CatalogResult<Product> {
        let existing = self.get(business, product_id).await?;
        let request = request.trimmed();
        request.validate_all()?;
        self.apply(business, existing, request).await
    }

    pub async fn delete(&self, business: BusinessId, product_id: i32) -> CatalogResult<()> {
        let existing = self.get(business, product_id).await?;
        if !self.store.delete_product(business, existing.id).await? {
            return Err(CatalogError::NotFound("Product"));
        }
        info!(business_id = %business, product_id, "Product deleted");
        Ok(())
    }

    async fn apply(
        &self,
        business: BusinessId,
        existing: Product,
        request: UpdateProductRequest,
    ) -> CatalogResult<Product> {
        let category_pk = match request.category {
            Some(category_id) => Some(self.resolve_category(business, category_id).await?),
            None => None,
        };

        let changes = ProductChanges {
            category_pk,
            name: request.name,
            description: request.description,
            price: request.price.map(shared::validation::normalize_price),
            image_url: request.image_url,
            is_active: request.is_active,
            is_feature: request.is_feature,
        };

        let product = self
            .store
            .update_product(business, existing.id, changes)
            .await?
            .ok_or(CatalogError::NotFound("Product"))?;

        info!(
            business_id = %business,
            product_id = product.product_id,
            "Product updated"
        );
        Ok(product)
    }

    /// Maps an external category id to the internal id of a category the
    /// business owns.
    async fn resolve_category(&self, business: BusinessId, category_id: i32) -> CatalogResult<i64> {
        self.store
            .find_category(business, category_id)
            .await?
            .map(|category| category.id)
            .ok_or(CatalogError::InvalidCategory(category_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCatalogStore;
    use rust_decimal::Decimal;
    use std::collections::HashSet;
    use std::str::FromStr;

    const SHOP_A: BusinessId = BusinessId::new(1);
    const SHOP_B: BusinessId = BusinessId::new(2);

    fn services() -> (CategoryService, ProductService) {
        let store: Arc<dyn CatalogStore> = Arc::new(InMemoryCatalogStore::new());
        (
            CategoryService::new(store.clone(), 256),
            ProductService::new(store, 256),
        )
    }

    fn category_request(name: &str, slug: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: Some(name.to_string()),
            slug: Some(slug.to_string()),
            ..Default::default()
        }
    }

    fn product_request(category: i32, price: &str) -> CreateProductRequest {
        CreateProductRequest {
            category: Some(category),
            name: Some("Smartphone X".to_string()),
            price: Some(Decimal::from_str(price).unwrap()),
            ..Default::default()
        }
    }

    fn field_keys(err: CatalogError) -> Vec<&'static str> {
        match err {
            CatalogError::Validation(errors) => {
                let mut keys: Vec<&'static str> = errors.field_errors().into_keys().collect();
                keys.sort();
                keys
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_category_stamps_business_and_mints_id() {
        let (categories, _) = services();
        let category = categories
            .create(SHOP_A, category_request("Electronics", "electronics"))
            .await
            .unwrap();

        assert_eq!(category.business_id, SHOP_A);
        assert!(IdSpace::CATEGORY.contains(category.category_id));
        assert!(category.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_name_and_slug_are_both_reported() {
        let (categories, _) = services();
        categories
            .create(SHOP_A, category_request("Electronics", "electronics"))
            .await
            .unwrap();

        let err = categories
            .create(SHOP_A, category_request("Electronics", "electronics"))
            .await
            .unwrap_err();
        assert_eq!(field_keys(err), vec!["name", "slug"]);

        // Another business may reuse both.
        assert!(categories
            .create(SHOP_B, category_request("Electronics", "electronics"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_foreign_category_is_not_found() {
        let (categories, _) = services();
        let category = categories
            .create(SHOP_A, category_request("Books", "books"))
            .await
            .unwrap();

        assert!(matches!(
            categories.get(SHOP_B, category.category_id).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            categories
                .update(SHOP_B, category.category_id, UpdateCategoryRequest::default())
                .await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            categories.delete(SHOP_B, category.category_id).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(categories.get(SHOP_A, category.category_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_revalidates_uniqueness() {
        let (categories, _) = services();
        categories
            .create(SHOP_A, category_request("Books", "books"))
            .await
            .unwrap();
        let toys = categories
            .create(SHOP_A, category_request("Toys", "toys"))
            .await
            .unwrap();

        let err = categories
            .update(
                SHOP_A,
                toys.category_id,
                UpdateCategoryRequest {
                    slug: Some("books".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(field_keys(err), vec!["slug"]);

        let renamed = categories
            .update(
                SHOP_A,
                toys.category_id,
                UpdateCategoryRequest {
                    name: Some("Toys".to_string()),
                    description: Some("Kids".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.description.as_deref(), Some("Kids"));
        assert_eq!(renamed.business_id, SHOP_A);
    }

    #[tokio::test]
    async fn test_product_rejects_foreign_category() {
        let (categories, products) = services();
        let foreign = categories
            .create(SHOP_B, category_request("Books", "books"))
            .await
            .unwrap();

        let result = products
            .create(SHOP_A, product_request(foreign.category_id, "10.00"))
            .await;
        assert!(matches!(result, Err(CatalogError::InvalidCategory(id)) if id == foreign.category_id));
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let (categories, products) = services();
        let category = categories
            .create(SHOP_A, category_request("Electronics", "electronics"))
            .await
            .unwrap();

        let product = products
            .create(SHOP_A, product_request(category.category_id, "19999"))
            .await
            .unwrap();
        assert!(IdSpace::PRODUCT.contains(product.product_id));
        assert_eq!(product.price.to_string(), "19999.00");
        assert_eq!(product.category, category.category_id);
        assert!(!product.is_feature);

        let patched = products
            .update(
                SHOP_A,
                product.product_id,
                UpdateProductRequest {
                    is_feature: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(patched.is_feature);
        assert_eq!(patched.name, "Smartphone X");

        let featured = products.featured(SHOP_A).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert!(products.featured(SHOP_B).await.unwrap().is_empty());

        products.delete(SHOP_A, product.product_id).await.unwrap();
        assert!(matches!(
            products.get(SHOP_A, product.product_id).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_requires_full_payload() {
        let (categories, products) = services();
        let category = categories
            .create(SHOP_A, category_request("Books", "books"))
            .await
            .unwrap();
        let product = products
            .create(SHOP_A, product_request(category.category_id, "5.00"))
            .await
            .unwrap();

        let err = products
            .replace(SHOP_A, product.product_id, CreateProductRequest::default())
            .await
            .unwrap_err();
        assert_eq!(field_keys(err), vec!["category", "name", "price"]);
    }

    #[tokio::test]
    async fn test_category_products_and_cascade() {
        let (categories, products) = services();
        let category = categories
            .create(SHOP_A, category_request("Books", "books"))
            .await
            .unwrap();
        products
            .create(SHOP_A, product_request(category.category_id, "5.00"))
            .await
            .unwrap();
        products
            .create(SHOP_A, product_request(category.category_id, "7.50"))
            .await
            .unwrap();

        let listing = categories.products(SHOP_A, category.category_id).await.unwrap();
        assert_eq!(listing.products_count, 2);
        assert_eq!(listing.category_name, "Books");
        assert!(matches!(
            categories.products(SHOP_B, category.category_id).await,
            Err(CatalogError::NotFound(_))
        ));

        categories.delete(SHOP_A, category.category_id).await.unwrap();
        assert!(products.list(SHOP_A).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_category_ids_unique_across_businesses() {
        let (categories, _) = services();
        let mut seen = HashSet::new();

        for business in 1..=5 {
            let business = BusinessId::new(business);
            for n in 0..300 {
                let category = categories
                    .create(
                        business,
                        category_request(&format!("Category {}", n), &format!("category-{}", n)),
                    )
                    .await
                    .unwrap();
                assert!(IdSpace::CATEGORY.contains(category.category_id));
                assert!(
                    seen.insert(category.category_id),
                    "category id {} issued twice",
                    category.category_id
                );
            }
        }

        assert_eq!(seen.len(), 1500);
    }

    #[tokio::test]
    async fn test_product_ids_unique_across_businesses() {
        let (categories, products) = services();
        let mut seen = HashSet::new();

        for business in 1..=3 {
            let business = BusinessId::new(business);
            let category = categories
                .create(business, category_request("Electronics", "electronics"))
                .await
                .unwrap();
            for _ in 0..300 {
                let product = products
                    .create(business, product_request(category.category_id, "19.99"))
                    .await
                    .unwrap();
                assert!(IdSpace::PRODUCT.contains(product.product_id));
                assert!(
                    seen.insert(product.product_id),
                    "product id {} issued twice",
                    product.product_id
                );
            }
        }

        assert_eq!(seen.len(), 900);
    }
}
