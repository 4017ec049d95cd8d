//! YouTube Data API client for public video statistics.
//!
//! Stats are best effort: any upstream failure is logged and reported as
//! zero counts so the detail endpoint never fails because of YouTube.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::VideoStats;
use serde::Deserialize;
use tracing::{debug, warn};

/// Error type for stats lookups.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Stats request failed: {0}")]
    Request(String),

    #[error("YouTube API returned HTTP {0}")]
    Status(u16),

    #[error("Unexpected stats response: {0}")]
    InvalidResponse(String),
}

/// Source of engagement counters for a YouTube video id.
#[async_trait]
pub trait VideoStatsSource: Send + Sync {
    /// Never fails; unavailable stats are zero.
    async fn stats(&self, video_id: &str) -> VideoStats;
}

/// Used when the YouTube integration is disabled.
pub struct ZeroStats;

#[async_trait]
impl VideoStatsSource for ZeroStats {
    async fn stats(&self, _video_id: &str) -> VideoStats {
        VideoStats::default()
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    statistics: Statistics,
}

/// Counts arrive as decimal strings; hidden counters are omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

fn parse_count(value: Option<&str>) -> Result<u64, StatsError> {
    match value {
        None => Ok(0),
        Some(v) => v
            .parse()
            .map_err(|_| StatsError::InvalidResponse(format!("non-numeric count {:?}", v))),
    }
}

pub struct YoutubeStatsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YoutubeStatsClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StatsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatsError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches statistics, surfacing upstream failures.
    pub async fn fetch(&self, video_id: &str) -> Result<VideoStats, StatsError> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "statistics"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StatsError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StatsError::Status(response.status().as_u16()));
        }

        let body: VideoListResponse = response
            .json()
            .await
            .map_err(|e| StatsError::InvalidResponse(e.to_string()))?;

        // Unknown or private videos come back with no items.
        let Some(item) = body.items.into_iter().next() else {
            debug!(video_id, "No statistics returned for video");
            return Ok(VideoStats::default());
        };

        let s = item.statistics;
        Ok(VideoStats {
            views: parse_count(s.view_count.as_deref())?,
            likes: parse_count(s.like_count.as_deref())?,
            comments: parse_count(s.comment_count.as_deref())?,
        })
    }
}

#[async_trait]
impl VideoStatsSource for YoutubeStatsClient {
    async fn stats(&self, video_id: &str) -> VideoStats {
        match self.fetch(video_id).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(video_id, error = %e, "Falling back to empty video stats");
                metrics::counter!("youtube_stats_failures_total").increment(1);
                VideoStats::default()
            }
        }
    }
}
