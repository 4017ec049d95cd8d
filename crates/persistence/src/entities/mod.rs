//! Entity definitions (database row mappings).

pub mod category;
pub mod product;
pub mod skill_video;

pub use category::CategoryEntity;
pub use product::ProductEntity;
pub use skill_video::SkillVideoEntity;
