//! Category routes.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use domain::models::category::{CreateCategoryRequest, UpdateCategoryRequest};
use domain::models::product::CategoryProductsResponse;
use domain::models::Category;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{BusinessTenant, ResourceId, ValidJson};
use crate::middleware::metrics::record_catalog_write;

/// GET /api/categories/
///
/// Active categories of the caller's business, newest first.
pub async fn list_categories(
    State(state): State<AppState>,
    tenant: BusinessTenant,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.categories.list(tenant.business_id()).await?;
    Ok(Json(categories))
}

/// POST /api/categories/
pub async fn create_category(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ValidJson(request): ValidJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state
        .categories
        .create(tenant.business_id(), request)
        .await?;
    record_catalog_write("category", "create");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories/:category_id/
pub async fn get_category(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(category_id): ResourceId,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .categories
        .get(tenant.business_id(), category_id)
        .await?;
    Ok(Json(category))
}

/// PUT /api/categories/:category_id/
///
/// Partial update; omitted fields keep their values.
pub async fn update_category(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(category_id): ResourceId,
    ValidJson(request): ValidJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .categories
        .update(tenant.business_id(), category_id, request)
        .await?;
    record_catalog_write("category", "update");
    Ok(Json(category))
}

/// DELETE /api/categories/:category_id/
pub async fn delete_category(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(category_id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state
        .categories
        .delete(tenant.business_id(), category_id)
        .await?;
    record_catalog_write("category", "delete");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/categories/:category_id/products/
pub async fn category_products(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ResourceId(category_id): ResourceId,
) -> Result<Json<CategoryProductsResponse>, ApiError> {
    let response = state
        .categories
        .products(tenant.business_id(), category_id)
        .await?;
    Ok(Json(response))
}
