//! Custom Axum extractors.

pub mod business_tenant;
pub mod resource_id;
pub mod valid_json;

pub use business_tenant::BusinessTenant;
pub use resource_id::ResourceId;
pub use valid_json::ValidJson;
