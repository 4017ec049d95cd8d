//! Domain services for the catalog.
//!
//! Services hold the tenant-scoped business rules and run against any
//! [`CatalogStore`](crate::store::CatalogStore) implementation.

pub mod catalog;
pub mod id_mint;
pub mod skill_video;

pub use catalog::{CategoryService, ProductService};
pub use id_mint::{mint_unique, IdSpace, DEFAULT_MAX_ATTEMPTS};
pub use skill_video::SkillVideoService;
