//! Skill video domain models and YouTube URL handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::tenant::BusinessId;

/// An instructional video registered by a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SkillVideo {
    pub id: i64,
    pub business_id: BusinessId,
    pub title: String,
    pub description: Option<String>,
    pub youtube_url: String,
    pub youtube_video_id: String,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for registering a skill video.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateSkillVideoRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 2048, message = "URL must be between 1 and 2048 characters")
    )]
    pub youtube_url: Option<String>,

    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 255, message = "Title must be between 1 and 255 characters")
    )]
    pub title: Option<String>,

    pub description: Option<String>,
}

impl CreateSkillVideoRequest {
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self.youtube_url = self.youtube_url.map(|u| u.trim().to_string());
        self
    }
}

/// Public engagement counters for a video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStats {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillVideoDetailResponse {
    pub video: SkillVideo,
    pub youtube_stats: VideoStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSkillVideoResponse {
    pub message: &'static str,
    pub data: SkillVideo,
}

impl CreateSkillVideoResponse {
    pub fn created(video: SkillVideo) -> Self {
        Self {
            message: "Skill video created successfully",
            data: video,
        }
    }
}

/// Extracts the video id from a YouTube watch or short link.
///
/// `watch?v=<id>&...` takes the text after the last `v=` up to the next `&`.
/// `youtu.be/<id>?...` takes the text after `youtu.be/` up to the next `?`.
/// Anything else, or an empty id, yields `None`.
pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    let id = if let Some((_, rest)) = url.rsplit_once("v=") {
        rest.split('&').next()
    } else if let Some((_, rest)) = url.rsplit_once("youtu.be/") {
        rest.split('?').next()
    } else {
        None
    }?;

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
