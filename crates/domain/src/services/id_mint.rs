//! Random external id allocation.
//!
//! Ids are drawn uniformly from a fixed range. A draw is rejected when the
//! pre-check finds it taken, or when the insert itself hits the unique
//! constraint on the id (the constraint is authoritative under concurrency).

use std::future::Future;

use rand::Rng;

use crate::error::{CatalogError, CatalogResult};
use crate::store::{StoreError, UniqueKey};

/// Default cap on draws before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 256;

/// An inclusive range of external ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSpace {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
}

impl IdSpace {
    /// 4-digit category ids.
    pub const CATEGORY: IdSpace = IdSpace {
        name: "category",
        min: 1000,
        max: 9999,
    };

    /// 6-digit product ids.
    pub const PRODUCT: IdSpace = IdSpace {
        name: "product",
        min: 100_000,
        max: 999_999,
    };

    pub fn draw(&self) -> i32 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    pub fn contains(&self, id: i32) -> bool {
        (self.min..=self.max).contains(&id)
    }
}

/// Draws ids from `space` until `attempt` stores a row.
///
/// `attempt` returns `Ok(None)` when the id is already taken. A unique
/// violation on `id_key` also counts as taken. Any other error aborts.
pub async fn mint_unique<T, F, Fut>(
    space: IdSpace,
    id_key: UniqueKey,
    max_attempts: u32,
    mut attempt: F,
) -> CatalogResult<T>
where
    F: FnMut(i32) -> Fut,
    Fut: Future<Output = Result<Option<T>, StoreError>>,
{
    for round in 1..=max_attempts.max(1) {
        let id = space.draw();
        match attempt(id).await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {
                tracing::debug!(space = space.name, id, round, "External id taken, redrawing");
            }
            Err(StoreError::UniqueViolation(key)) if key == id_key => {
                tracing::debug!(space = space.name, id, round, "External id raced, redrawing");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::error!(
        space = space.name,
        attempts = max_attempts,
        "External id space exhausted"
    );
    Err(CatalogError::ResourceExhausted(space.name))
}
