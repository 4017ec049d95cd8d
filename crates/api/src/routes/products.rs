//! Product routes.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use domain::models::product::{CreateProductRequest, UpdateProductRequest};
use domain::models::Product;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{BusinessTenant, ResourceId, ValidJson};
use crate::middleware::metrics::record_catalog_write;

/// GET /api/products/
pub async fn list_products(
    State(state): State<AppState>,
    tenant: BusinessTenant,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.list(tenant.business_id()).await?))
}

/// GET /api/products/featured/
pub async fn featured_products(
    State(state): State<AppState>,
    tenant: BusinessTenant,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.featured(tenant.business_id()).await?))
}

/// POST /api/products/
///
/// `category` is the external id of one of the caller's categories.
pub async fn create_product(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ValidJson(request): ValidJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.create(tenant.business_id(), request).await?;
    record_catalog_write("product", "create");
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/:product_id/
pub async fn get_product(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(product_id): ResourceId,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(
        state.products.get(tenant.business_id(), product_id).await?,
    ))
}

/// PUT /api/products/:product_id/
pub async fn replace_product(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(product_id): ResourceId,
    ValidJson(request): ValidJson<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .products
        .replace(tenant.business_id(), product_id, request)
        .await?;
    record_catalog_write("product", "update");
    Ok(Json(product))
}

/// PATCH /api/products/:product_id/
pub async fn update_product(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(product_id): ResourceId,
    ValidJson(request): ValidJson<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .products
        .update(tenant.business_id(), product_id, request)
        .await?;
    record_catalog_write("product", "update");
    Ok(Json(product))
}

/// DELETE /api/products/:product_id/
pub async fn delete_product(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(product_id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state
        .products
        .delete(tenant.business_id(), product_id)
        .await?;
    record_catalog_write("product", "delete");
    Ok(StatusCode::NO_CONTENT)
}
