pub mod request_id;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, oauth::OAuthController, publish::PublishController};
use crate::infrastructure::config::Config;
use crate::infrastructure::session::{session_middleware, SessionLayer};

pub use request_id::{request_id_middleware, X_REQUEST_ID};

/// Assemble every route with its middleware stack
pub fn create_router(
    oauth_controller: Arc<OAuthController>,
    publish_controller: Arc<PublishController>,
    session_layer: SessionLayer,
) -> Router {
    // OAuth routes
    let oauth_routes = Router::new()
        .route("/", get(OAuthController::home))
        .route("/tiktok/login", get(OAuthController::login))
        .route("/tiktok/callback", get(OAuthController::callback))
        .route("/logout", get(OAuthController::logout))
        .with_state(oauth_controller);

    // Publish routes (redirect home when not connected)
    let publish_routes = Router::new()
        .route(
            "/publish",
            get(PublishController::publish_page).post(PublishController::publish),
        )
        .route("/done", get(PublishController::done))
        .with_state(publish_controller);

    Router::new()
        .merge(oauth_routes)
        .merge(publish_routes)
        .layer(middleware::from_fn_with_state(session_layer, session_middleware))
        .route("/health", get(health::health))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until shutdown
pub async fn start_http_server(config: Arc<Config>, app: Router) -> anyhow::Result<()> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
