//! Tenant identity resolved from a verified business token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque merchant account id minted by the identity server.
///
/// Every tenant-scoped storage and service operation takes one of these by
/// value. It is only ever constructed from verified token claims or from
/// rows already owned by that tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(i64);

impl BusinessId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The authenticated merchant attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantPrincipal {
    /// Identity record id (`id` claim).
    pub identity_id: Option<String>,
    /// Login user id (`user_id` claim).
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub business_id: BusinessId,
    pub business_name: Option<String>,
}
