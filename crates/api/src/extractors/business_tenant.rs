//! Authenticated business extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::models::{BusinessId, TenantPrincipal};

use crate::app::AppState;
use crate::error::ApiError;

/// The verified merchant making the request.
///
/// Uses the principal stored by `require_business_auth` when the route is
/// behind it, otherwise verifies the `Authorization` header itself.
#[derive(Debug, Clone)]
pub struct BusinessTenant(pub TenantPrincipal);

impl BusinessTenant {
    pub fn business_id(&self) -> BusinessId {
        self.0.business_id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BusinessTenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<TenantPrincipal>() {
            return Ok(BusinessTenant(principal.clone()));
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        state
            .verifier
            .verify_header(header)
            .await?
            .map(BusinessTenant)
            .ok_or_else(|| {
                ApiError::Unauthorized("Authentication credentials were not provided".to_string())
            })
    }
}
