//! HTTP route handlers.

pub mod categories;
pub mod health;
pub mod products;
pub mod skill_videos;
