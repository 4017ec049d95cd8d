//! Domain layer for the catalog backend.
//!
//! This crate contains:
//! - Domain models (Category, Product, SkillVideo) and the tenant principal
//! - Storage traits with an in-memory implementation
//! - Tenant-scoped catalog and video services
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::CatalogError;
