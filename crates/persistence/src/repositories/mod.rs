//! Repository implementations for database operations.

pub mod category;
pub mod product;
pub mod skill_video;

pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use skill_video::SkillVideoRepository;
