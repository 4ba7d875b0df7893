use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used when the caption is empty or whitespace
pub const DEFAULT_TITLE: &str = "WildFacts";

/// Upstream limit on the post title, in characters
pub const MAX_TITLE_CHARS: usize = 2000;

pub const DEFAULT_PRIVACY_LEVEL: &str = "SELF_ONLY";

/// Snapshot of what the creator may post, as reported by the creator-info endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatorInfo {
    pub nickname: Option<String>,
    pub username: Option<String>,
    pub privacy_level_options: Vec<String>,
}

impl CreatorInfo {
    /// Read the interesting fields out of a raw creator-info response,
    /// tolerating absence or null at every level
    pub fn from_response(body: &Value) -> Self {
        let data = body.get("data");
        let text = |key: &str| {
            data.and_then(|d| d.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            nickname: text("creator_nickname"),
            username: text("creator_username"),
            privacy_level_options: data
                .and_then(|d| d.get("privacy_level_options"))
                .and_then(Value::as_array)
                .map(|opts| {
                    opts.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostInfo {
    pub title: String,
    pub privacy_level: String,
    pub disable_duet: bool,
    pub disable_comment: bool,
    pub disable_stitch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub source: String,
    pub video_url: String,
}

/// Body of the publish-init call: the platform pulls the video from `video_url`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub post_info: PostInfo,
    pub source_info: SourceInfo,
}

impl PublishRequest {
    pub fn new(video_url: &str, caption: &str, privacy_level: &str) -> Self {
        Self {
            post_info: PostInfo {
                title: build_title(caption),
                privacy_level: privacy_level.to_string(),
                disable_duet: false,
                disable_comment: false,
                disable_stitch: false,
            },
            source_info: SourceInfo {
                source: "PULL_FROM_URL".to_string(),
                video_url: video_url.to_string(),
            },
        }
    }
}

/// Trimmed caption, capped at [`MAX_TITLE_CHARS`], or [`DEFAULT_TITLE`] when blank
pub fn build_title(caption: &str) -> String {
    let trimmed = caption.trim();
    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    trimmed.chars().take(MAX_TITLE_CHARS).collect()
}

/// Raw publish-init response that passed the error-envelope check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PublishResult(pub Value);

impl PublishResult {
    pub fn publish_id(&self) -> Option<&str> {
        self.0.get("data")?.get("publish_id")?.as_str()
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
