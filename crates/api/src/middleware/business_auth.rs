//! Business token authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;

const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided";

/// Rejects requests without a verified business token.
///
/// On success the [`TenantPrincipal`](domain::models::TenantPrincipal) is
/// stored in request extensions for the `BusinessTenant` extractor.
pub async fn require_business_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match state.verifier.verify_header(header.as_deref()).await {
        Ok(Some(principal)) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Ok(None) => ApiError::Unauthorized(MISSING_CREDENTIALS.to_string()).into_response(),
        Err(e) => {
            debug!(error = %e, "Business token rejected");
            ApiError::from(e).into_response()
        }
    }
}
