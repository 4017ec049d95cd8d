//! Skill video entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{BusinessId, SkillVideo};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SkillVideoEntity {
    pub id: i64,
    pub business_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub youtube_url: String,
    pub youtube_video_id: String,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SkillVideoEntity> for SkillVideo {
    fn from(entity: SkillVideoEntity) -> Self {
        Self {
            id: entity.id,
            business_id: BusinessId::new(entity.business_id),
            title: entity.title,
            description: entity.description,
            youtube_url: entity.youtube_url,
            youtube_video_id: entity.youtube_video_id,
            is_locked: entity.is_locked,
            created_at: entity.created_at,
        }
    }
}
