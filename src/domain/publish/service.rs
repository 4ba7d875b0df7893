use super::{CreatorInfo, PublishResult, DEFAULT_PRIVACY_LEVEL};
use crate::error::{AppError, AppResult};
use crate::infrastructure::publish::TikTokPublishClient;
use std::sync::Arc;

/// Publishes one of the pre-hosted videos on behalf of the connected creator
pub struct PublishService {
    client: Arc<TikTokPublishClient>,
    video_base_url: String,
    available_videos: Vec<String>,
}

impl PublishService {
    pub fn new(
        client: Arc<TikTokPublishClient>,
        video_base_url: String,
        available_videos: Vec<String>,
    ) -> Self {
        Self {
            client,
            video_base_url,
            available_videos,
        }
    }

    pub fn available_videos(&self) -> &[String] {
        &self.available_videos
    }

    pub fn video_base_url(&self) -> &str {
        &self.video_base_url
    }

    /// Public URL TikTok will pull the video from. Only hosted files are allowed.
    pub fn video_url(&self, filename: &str) -> AppResult<String> {
        if !self.available_videos.iter().any(|v| v == filename) {
            return Err(AppError::BadRequest(format!("Unknown video: {}", filename)));
        }
        Ok(format!("{}{}", self.video_base_url, filename))
    }

    pub async fn creator_info(&self, access_token: &str) -> AppResult<CreatorInfo> {
        let body = self.client.fetch_creator_info(access_token).await?;
        Ok(CreatorInfo::from_response(&body))
    }

    pub async fn publish(
        &self,
        access_token: &str,
        filename: &str,
        caption: &str,
        privacy_level: &str,
    ) -> AppResult<PublishResult> {
        let video_url = self.video_url(filename)?;
        let privacy_level = match privacy_level.trim() {
            "" => DEFAULT_PRIVACY_LEVEL,
            level => level,
        };

        tracing::info!(video_url = %video_url, privacy_level, "Submitting direct post");

        self.client
            .submit_direct_post(access_token, &video_url, caption, privacy_level)
            .await
    }
}
