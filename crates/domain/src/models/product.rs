//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::tenant::BusinessId;

/// A product owned by one business and filed under one of its categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Product {
    #[serde(skip_serializing, default)]
    pub id: i64,
    /// 6-digit external id, globally unique.
    pub product_id: i32,
    pub business_id: BusinessId,
    /// External id of the owning category.
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

/// Request payload for creating a product, also used for full replacement.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateProductRequest {
    /// External category id.
    #[validate(required(message = "This field is required."))]
    pub category: Option<i32>,

    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(required(message = "This field is required."))]
    pub price: Option<Decimal>,

    pub image_url: Option<String>,

    pub is_active: Option<bool>,

    pub is_feature: Option<bool>,
}

impl CreateProductRequest {
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self
    }

    /// Runs derive validation plus the price rules, collecting every field error.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        if let Some(price) = &self.price {
            if let Err(e) = shared::validation::validate_price(price) {
                errors.add("price", e);
            }
        }
        if errors.field_errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Request payload for a partial product update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProductRequest {
    pub category: Option<i32>,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub price: Option<Decimal>,

    pub image_url: Option<String>,

    pub is_active: Option<bool>,

    pub is_feature: Option<bool>,
}

impl UpdateProductRequest {
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self
    }

    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        if let Some(price) = &self.price {
            if let Err(e) = shared::validation::validate_price(price) {
                errors.add("price", e);
            }
        }
        if errors.field_errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<CreateProductRequest> for UpdateProductRequest {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            category: request.category,
            name: request.name,
            description: request.description,
            price: request.price,
            image_url: request.image_url,
            is_active: request.is_active,
            is_feature: request.is_feature,
        }
    }
}

/// Response for the products-in-category listing.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProductsResponse {
    pub category_id: i32,
    pub category_name: String,
    pub products_count: usize,
    pub products: Vec<Product>,
}

impl CategoryProductsResponse {
    pub fn new(category_id: i32, category_name: String, products: Vec<Product>) -> Self {
        Self {
            category_id,
            category_name,
            products_count: products.len(),
            products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_create_request_valid() {
        let request: CreateProductRequest = serde_json::from_value(json!({
            "category": 4821,
            "name": "Smartphone X",
            "description": "Latest Android phone",
            "price": "19999.00",
            "is_feature": true
        }))
        .unwrap();
        assert!(request.validate_all().is_ok());
        assert_eq!(request.price, Some(Decimal::from_str("19999.00").unwrap()));
    }

    #[test]
    fn test_price_accepts_json_number() {
        let request: CreateProductRequest = serde_json::from_value(json!({
            "category": 4821,
            "name": "Cable",
            "price": 250
        }))
        .unwrap();
        assert!(request.validate_all().is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = CreateProductRequest::default().validate_all().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("category"));
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_price_errors_merge_with_field_errors() {
        let request = CreateProductRequest {
            category: Some(1000),
            name: Some("x".repeat(201)),
            price: Some(Decimal::from_str("1.999").unwrap()),
            ..Default::default()
        };
        let errors = request.validate_all().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_update_negative_price() {
        let request = UpdateProductRequest {
            price: Some(Decimal::from_str("-5").unwrap()),
            ..Default::default()
        };
        assert!(request.validate_all().is_err());
        assert!(UpdateProductRequest::default().validate_all().is_ok());
    }

    #[test]
    fn test_category_products_response_counts() {
        let response = CategoryProductsResponse::new(4821, "Electronics".into(), vec![]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["products_count"], 0);
        assert_eq!(value["category_name"], "Electronics");
    }
}
