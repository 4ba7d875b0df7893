use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tiktok_publisher::controllers::{oauth::OAuthController, publish::PublishController};
use tiktok_publisher::domain::{auth::TokenService, publish::PublishService};
use tiktok_publisher::infrastructure::config::{Config, LogFormat};
use tiktok_publisher::infrastructure::http::{create_router, start_http_server};
use tiktok_publisher::infrastructure::oauth::TikTokOAuthClient;
use tiktok_publisher::infrastructure::publish::TikTokPublishClient;
use tiktok_publisher::infrastructure::session::{SessionLayer, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting TikTok publisher on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        video_base_url = %config.video_base_url,
        videos = config.available_videos.len(),
        "Serving pre-hosted videos"
    );

    let config = Arc::new(config);

    // 1. Upstream clients
    let oauth_client = Arc::new(TikTokOAuthClient::new(
        config.tiktok_client_key.clone(),
        config.tiktok_client_secret.clone(),
        config.tiktok_redirect_uri.clone(),
    ));
    let publish_client = Arc::new(TikTokPublishClient::new());

    // 2. Services
    let token_service = Arc::new(TokenService::new(oauth_client.clone()));
    let publish_service = Arc::new(PublishService::new(
        publish_client,
        config.video_base_url.clone(),
        config.available_videos.clone(),
    ));

    // 3. Controllers
    let oauth_controller = Arc::new(OAuthController::new(oauth_client));
    let publish_controller = Arc::new(PublishController::new(token_service, publish_service));

    // 4. Sessions
    let session_layer = SessionLayer {
        store: SessionStore::new(Duration::from_secs(config.session_ttl_hours * 3600)),
        secure_cookie: !config.is_development(),
    };

    let app = create_router(oauth_controller, publish_controller, session_layer);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tiktok_publisher=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
