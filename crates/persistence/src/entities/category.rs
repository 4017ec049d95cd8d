//! Category entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BusinessId, Category};
use sqlx::FromRow;

/// Database row mapping for the categories table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryEntity {
    pub id: i64,
    pub category_id: i32,
    pub business_id: i64,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryEntity> for Category {
    fn from(entity: CategoryEntity) -> Self {
        Self {
            id: entity.id,
            category_id: entity.category_id,
            business_id: BusinessId::new(entity.business_id),
            name: entity.name,
            slug: entity.slug,
            image_url: entity.image_url,
            description: entity.description,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
