//! Errors raised by catalog services.

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::store::{StoreError, UniqueKey};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// One or more field errors, collected rather than fail-fast.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Missing, or owned by another business.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Category {0} does not exist for this business")]
    InvalidCategory(i32),

    /// External id space could not yield a free value.
    #[error("No free {0} identifier could be allocated")]
    ResourceExhausted(&'static str),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

pub const DUPLICATE_NAME_MESSAGE: &str = "A category with this name already exists for this business.";
pub const DUPLICATE_SLUG_MESSAGE: &str = "A category with this slug already exists for this business.";

impl CatalogError {
    /// Builds a validation error carrying a single field message.
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        push_field_error(&mut errors, field, code, message);
        CatalogError::Validation(errors)
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(UniqueKey::CategoryName) => {
                CatalogError::field("name", "unique", DUPLICATE_NAME_MESSAGE)
            }
            StoreError::UniqueViolation(UniqueKey::CategorySlug) => {
                CatalogError::field("slug", "unique", DUPLICATE_SLUG_MESSAGE)
            }
            other => CatalogError::Storage(other),
        }
    }
}

/// Adds a field error to an accumulating set.
pub fn push_field_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    code: &'static str,
    message: &'static str,
) {
    let err: ValidationError = shared::validation::field_error(code, message);
    errors.add(field, err);
}
