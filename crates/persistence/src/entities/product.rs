//! Product entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BusinessId, Product};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Product row joined with the external id and name of its category.
#[derive(Debug, Clone, FromRow)]
pub struct ProductEntity {
    pub id: i64,
    pub product_id: i32,
    pub business_id: i64,
    pub category: i32,
    pub category_name: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_feature: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductEntity> for Product {
    fn from(entity: ProductEntity) -> Self {
        Self {
            id: entity.id,
            product_id: entity.product_id,
            business_id: BusinessId::new(entity.business_id),
            category: entity.category,
            category_name: entity.category_name,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            image_url: entity.image_url,
            is_active: entity.is_active,
            is_feature: entity.is_feature,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
