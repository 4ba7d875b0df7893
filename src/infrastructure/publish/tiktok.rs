use crate::domain::publish::{PublishRequest, PublishResult};
use crate::error::{AppError, AppResult};
use serde_json::Value;
use std::time::Duration;

pub const TIKTOK_CREATOR_INFO_URL: &str =
    "https://open.tiktokapis.com/v2/post/publish/creator_info/query/";
pub const TIKTOK_DIRECT_POST_URL: &str = "https://open.tiktokapis.com/v2/post/publish/video/init/";

const CREATOR_INFO_TIMEOUT: Duration = Duration::from_secs(30);
const DIRECT_POST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Content Posting API
pub struct TikTokPublishClient {
    creator_info_url: String,
    direct_post_url: String,
    creator_info_timeout: Duration,
    direct_post_timeout: Duration,
    http_client: reqwest::Client,
}

impl Default for TikTokPublishClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TikTokPublishClient {
    pub fn new() -> Self {
        Self::with_endpoints(
            TIKTOK_CREATOR_INFO_URL.to_string(),
            TIKTOK_DIRECT_POST_URL.to_string(),
        )
    }

    pub fn with_endpoints(creator_info_url: String, direct_post_url: String) -> Self {
        Self {
            creator_info_url,
            direct_post_url,
            creator_info_timeout: CREATOR_INFO_TIMEOUT,
            direct_post_timeout: DIRECT_POST_TIMEOUT,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_timeouts(mut self, creator_info: Duration, direct_post: Duration) -> Self {
        self.creator_info_timeout = creator_info;
        self.direct_post_timeout = direct_post;
        self
    }

    /// Query what the creator is allowed to post. Returns the body verbatim.
    pub async fn fetch_creator_info(&self, access_token: &str) -> AppResult<Value> {
        let response = self
            .http_client
            .post(&self.creator_info_url)
            .bearer_auth(access_token)
            .timeout(self.creator_info_timeout)
            .send()
            .await
            .map_err(|e| AppError::from_transport("TikTok creator info", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse creator info: {}", e)))
    }

    /// Ask TikTok to pull `video_url` and publish it.
    ///
    /// The HTTP status is not checked: the body is always decoded and only its
    /// `error.code` decides between success and failure.
    pub async fn submit_direct_post(
        &self,
        access_token: &str,
        video_url: &str,
        caption: &str,
        privacy_level: &str,
    ) -> AppResult<PublishResult> {
        let request = PublishRequest::new(video_url, caption, privacy_level);

        let response = self
            .http_client
            .post(&self.direct_post_url)
            .bearer_auth(access_token)
            .header("Content-Type", "application/json; charset=UTF-8")
            .json(&request)
            .timeout(self.direct_post_timeout)
            .send()
            .await
            .map_err(|e| AppError::from_transport("TikTok direct post", e))?;

        let status = response.status();
        let body = response.json::<Value>().await.map_err(|e| {
            AppError::ExternalService(format!(
                "Failed to parse direct post response (HTTP {}): {}",
                status.as_u16(),
                e
            ))
        })?;

        let result = check_publish_response(body)?;
        tracing::info!(
            status = status.as_u16(),
            publish_id = result.publish_id().unwrap_or("unknown"),
            "Direct post accepted"
        );

        Ok(result)
    }
}

/// Translate TikTok's `{"error": {"code", "message", "log_id"}}` envelope.
///
/// A missing envelope, any empty or zero code, or `"ok"` count as success.
pub fn check_publish_response(body: Value) -> AppResult<PublishResult> {
    let error = body.get("error");
    let code = match error.and_then(|e| e.get("code")) {
        None | Some(Value::Null) => None,
        Some(Value::String(code)) if code.is_empty() || code == "ok" => None,
        Some(Value::String(code)) => Some(code.clone()),
        Some(Value::Bool(false)) => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::Array(items)) if items.is_empty() => None,
        Some(Value::Object(fields)) if fields.is_empty() => None,
        Some(other) => Some(other.to_string()),
    };

    let Some(code) = code else {
        return Ok(PublishResult(body));
    };

    let field = |key: &str| {
        error
            .and_then(|e| e.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let err = AppError::RemoteApi {
        code,
        message: field("message").unwrap_or_default(),
        log_id: field("log_id").or_else(|| field("logid")),
    };
    tracing::warn!(error = %err, "Direct post rejected");

    Err(err)
}
