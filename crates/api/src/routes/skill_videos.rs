//! Skill video routes for businesses and the public member listing.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use domain::models::skill_video::{
    CreateSkillVideoRequest, CreateSkillVideoResponse, SkillVideoDetailResponse,
};
use domain::models::SkillVideo;
use serde::Deserialize;
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{BusinessTenant, ValidJson};
use crate::middleware::metrics::record_catalog_write;

#[derive(Debug, Deserialize)]
pub struct VideoDetailQuery {
    pub video_id: Option<String>,
}

impl VideoDetailQuery {
    fn parse_id(&self) -> Result<i64, ApiError> {
        let raw = self
            .video_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::field("video_id", "This field is required."))?;

        raw.parse()
            .map_err(|_| ApiError::field("video_id", "A valid integer is required."))
    }
}

/// POST /api/business/skill-video/create/
pub async fn create_skill_video(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    ValidJson(request): ValidJson<CreateSkillVideoRequest>,
) -> Result<(StatusCode, Json<CreateSkillVideoResponse>), ApiError> {
    let video = state.videos.create(tenant.business_id(), request).await?;
    record_catalog_write("skill_video", "create");
    Ok((
        StatusCode::CREATED,
        Json(CreateSkillVideoResponse::created(video)),
    ))
}

/// GET /api/business/skill-video/list/
pub async fn list_business_videos(
    State(state): State<AppState>,
    tenant: BusinessTenant,
) -> Result<Json<Vec<SkillVideo>>, ApiError> {
    Ok(Json(
        state.videos.list_for_business(tenant.business_id()).await?,
    ))
}

/// GET /api/business/skill-video/detail/?video_id=
///
/// One of the caller's videos with its public YouTube counters. Counters
/// are zero when YouTube cannot be reached.
pub async fn skill_video_detail(
    State(state): State<AppState>,
    tenant: BusinessTenant,
    Query(query): Query<VideoDetailQuery>,
) -> Result<Json<SkillVideoDetailResponse>, ApiError> {
    let id = query.parse_id()?;
    let video = state.videos.get(tenant.business_id(), id).await?;
    let youtube_stats = state.video_stats.stats(&video.youtube_video_id).await;
    debug!(video_id = id, ?youtube_stats, "Fetched video stats");

    Ok(Json(SkillVideoDetailResponse {
        video,
        youtube_stats,
    }))
}

/// GET /api/member/skill-video/list/
///
/// Public: every business's videos, newest first.
pub async fn member_video_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<SkillVideo>>, ApiError> {
    Ok(Json(state.videos.list_all().await?))
}
