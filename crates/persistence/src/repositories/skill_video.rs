//! Skill video repository for database operations.

use domain::models::BusinessId;
use domain::store::NewSkillVideo;
use sqlx::PgPool;

use crate::entities::SkillVideoEntity;
use crate::metrics::QueryTimer;

const VIDEO_COLUMNS: &str =
    "id, business_id, title, description, youtube_url, youtube_video_id, is_locked, created_at";

#[derive(Clone)]
pub struct SkillVideoRepository {
    pool: PgPool,
}

impl SkillVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, record: &NewSkillVideo) -> Result<SkillVideoEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_skill_video");
        let result = sqlx::query_as::<_, SkillVideoEntity>(&format!(
            r#"
            INSERT INTO skill_videos (business_id, title, description, youtube_url, youtube_video_id, is_locked)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(record.business_id.get())
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.youtube_url)
        .bind(&record.youtube_video_id)
        .bind(record.is_locked)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn find(
        &self,
        business: BusinessId,
        id: i64,
    ) -> Result<Option<SkillVideoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_skill_video");
        let result = sqlx::query_as::<_, SkillVideoEntity>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM skill_videos WHERE id = $1 AND business_id = $2"
        ))
        .bind(id)
        .bind(business.get())
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn list_for_business(
        &self,
        business: BusinessId,
    ) -> Result<Vec<SkillVideoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_business_skill_videos");
        let result = sqlx::query_as::<_, SkillVideoEntity>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS}
            FROM skill_videos
            WHERE business_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(business.get())
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn list_all(&self) -> Result<Vec<SkillVideoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_skill_videos");
        let result = sqlx::query_as::<_, SkillVideoEntity>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM skill_videos ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}
