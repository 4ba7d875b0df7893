use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    infrastructure::{
        oauth::{generate_state, state_matches, TikTokOAuthClient},
        session::Session,
    },
};

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

pub struct OAuthController {
    tiktok_client: Arc<TikTokOAuthClient>,
}

impl OAuthController {
    pub fn new(tiktok_client: Arc<TikTokOAuthClient>) -> Self {
        Self { tiktok_client }
    }

    /// GET / - Whether this browser session is connected to TikTok
    pub async fn home(Extension(session): Extension<Session>) -> impl IntoResponse {
        let data = session.load().await;
        Json(json!({ "connected": data.is_connected() }))
    }

    /// GET /tiktok/login - Initiate TikTok OAuth flow
    pub async fn login(
        State(controller): State<Arc<OAuthController>>,
        Extension(session): Extension<Session>,
    ) -> impl IntoResponse {
        let state = generate_state();

        let mut data = session.load().await;
        data.oauth_state = Some(state.clone());
        session.save(data).await;

        let auth_url = controller.tiktok_client.get_authorization_url(&state);
        tracing::info!("Redirecting to TikTok authorization");

        Redirect::temporary(&auth_url)
    }

    /// GET /tiktok/callback - Handle TikTok OAuth callback
    ///
    /// The state is checked before anything else and consumed whatever the
    /// outcome, so a callback can only be accepted once.
    pub async fn callback(
        State(controller): State<Arc<OAuthController>>,
        Extension(session): Extension<Session>,
        Query(params): Query<OAuthCallbackParams>,
    ) -> AppResult<Response> {
        let mut data = session.load().await;
        let expected = data.oauth_state.take();
        session.save(data.clone()).await;

        if !state_matches(expected.as_deref(), &params.state) {
            tracing::warn!(
                had_pending_state = expected.is_some(),
                "Rejecting OAuth callback with mismatched state"
            );
            return Err(AppError::StateMismatch);
        }

        if let Some(error) = params.error.filter(|e| !e.is_empty()) {
            return Err(AppError::BadRequest(format!(
                "Authorization failed: {} {}",
                error,
                params.error_description.unwrap_or_default()
            )
            .trim_end()
            .to_string()));
        }

        if params.code.is_empty() {
            return Err(AppError::BadRequest(
                "Missing authorization code".to_string(),
            ));
        }

        let token = controller.tiktok_client.exchange_code(&params.code).await?;
        tracing::info!(open_id = ?token.open_id, "TikTok account connected");

        data.token = Some(token);
        session.save(data).await;

        Ok(Redirect::temporary("/publish").into_response())
    }

    /// GET /logout - Forget the token and any pending state
    pub async fn logout(Extension(session): Extension<Session>) -> impl IntoResponse {
        session.clear().await;
        Redirect::to("/")
    }
}
