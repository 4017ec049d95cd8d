//! Category domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::tenant::BusinessId;

lazy_static::lazy_static! {
    pub static ref SLUG_REGEX: regex::Regex = regex::Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap();
}

/// A product category owned by one business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    /// Internal row id, never exposed.
    #[serde(skip_serializing, default)]
    pub id: i64,
    /// 4-digit external id, globally unique.
    pub category_id: i32,
    pub business_id: BusinessId,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a category.
///
/// There is deliberately no business field: ownership comes from the token.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCategoryRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 120, message = "Slug must be between 1 and 120 characters")
    )]
    #[validate(regex(
        path = *SLUG_REGEX,
        message = "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
    ))]
    pub slug: Option<String>,

    pub image_url: Option<String>,

    pub description: Option<String>,

    pub is_active: Option<bool>,
}

impl CreateCategoryRequest {
    /// Trims surrounding whitespace from text fields.
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.slug = self.slug.map(|s| s.trim().to_string());
        self
    }
}

/// Request payload for updating a category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Slug must be between 1 and 120 characters"))]
    #[validate(regex(
        path = *SLUG_REGEX,
        message = "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
    ))]
    pub slug: Option<String>,

    pub image_url: Option<String>,

    pub description: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateCategoryRequest {
    /// Trims surrounding whitespace from text fields.
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.slug = self.slug.map(|s| s.trim().to_string());
        self
    }
}
