//! Domain models for the catalog.

pub mod category;
pub mod product;
pub mod skill_video;
pub mod tenant;

pub use category::Category;
pub use product::Product;
pub use skill_video::{SkillVideo, VideoStats};
pub use tenant::{BusinessId, TenantPrincipal};
