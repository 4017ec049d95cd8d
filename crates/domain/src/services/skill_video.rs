//! Skill video registration and lookup.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::skill_video::{extract_youtube_video_id, CreateSkillVideoRequest};
use crate::models::{BusinessId, SkillVideo};
use crate::store::{CatalogStore, NewSkillVideo};

#[derive(Clone)]
pub struct SkillVideoService {
    store: Arc<dyn CatalogStore>,
}

impl SkillVideoService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Registers a locked video for the business. The URL must carry a
    /// recognizable YouTube video id.
    pub async fn create(
        &self,
        business: BusinessId,
        request: CreateSkillVideoRequest,
    ) -> CatalogResult<SkillVideo> {
        let request = request.trimmed();
        request.validate()?;

        let youtube_url = request.youtube_url.unwrap_or_default();
        let youtube_video_id = extract_youtube_video_id(&youtube_url).ok_or_else(|| {
            CatalogError::field("youtube_url", "invalid_youtube_url", "Invalid YouTube URL")
        })?;

        let video = self
            .store
            .insert_skill_video(NewSkillVideo {
                business_id: business,
                title: request.title.unwrap_or_default(),
                description: request.description,
                youtube_url,
                youtube_video_id,
                is_locked: true,
            })
            .await?;

        info!(
            business_id = %business,
            video_id = video.id,
            youtube_video_id = %video.youtube_video_id,
            "Skill video created"
        );
        Ok(video)
    }

    pub async fn list_for_business(&self, business: BusinessId) -> CatalogResult<Vec<SkillVideo>> {
        Ok(self.store.list_business_skill_videos(business).await?)
    }

    pub async fn get(&self, business: BusinessId, id: i64) -> CatalogResult<SkillVideo> {
        self.store
            .find_skill_video(business, id)
            .await?
            .ok_or(CatalogError::NotFound("Video"))
    }

    /// Every business's videos, for the public member listing.
    pub async fn list_all(&self) -> CatalogResult<Vec<SkillVideo>> {
        Ok(self.store.list_all_skill_videos().await?)
    }
}
