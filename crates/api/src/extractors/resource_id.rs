//! Integer id taken from the request path.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use tracing::debug;

use crate::error::ApiError;

/// The single `:id` segment of a resource route.
///
/// An id that is not a valid `i32` cannot name any row, so it is reported as
/// a JSON 404 rather than axum's plain-text path rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(ResourceId(id)),
            Err(rejection) => {
                debug!(path = %parts.uri.path(), error = %rejection, "Unparsable resource id");
                Err(ApiError::NotFound("Not found".into()))
            }
        }
    }
}
