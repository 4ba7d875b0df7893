use anyhow::Context;
use serde::Deserialize;
use std::env;

const DEFAULT_VIDEO_BASE_URL: &str = "https://social-deployment.netlify.app/";
const DEFAULT_AVAILABLE_VIDEOS: &str = "cat_anglais.mp4,dog_anglais.mp4";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // TikTok OAuth
    pub tiktok_client_key: String,
    pub tiktok_client_secret: String,
    pub tiktok_redirect_uri: String,
    // Published videos
    pub video_base_url: String,
    pub available_videos: Vec<String>,
    // Sessions
    pub session_ttl_hours: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tiktok_client_key: env::var("TIKTOK_CLIENT_KEY")
                .context("TIKTOK_CLIENT_KEY must be set")?,
            tiktok_client_secret: env::var("TIKTOK_CLIENT_SECRET")
                .context("TIKTOK_CLIENT_SECRET must be set")?,
            tiktok_redirect_uri: env::var("TIKTOK_REDIRECT_URI")
                .context("TIKTOK_REDIRECT_URI must be set")?,
            video_base_url: normalize_base_url(
                &env::var("VIDEO_BASE_URL").unwrap_or_else(|_| DEFAULT_VIDEO_BASE_URL.to_string()),
            ),
            available_videos: parse_video_list(
                &env::var("AVAILABLE_VIDEOS")
                    .unwrap_or_else(|_| DEFAULT_AVAILABLE_VIDEOS.to_string()),
            ),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .context("SESSION_TTL_HOURS must be a positive integer")?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Ensure the base URL ends with exactly one slash so filenames can be appended
pub fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

fn parse_video_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
