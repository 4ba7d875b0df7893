use crate::domain::auth::{Token, TokenRefresher, TokenResponse};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

pub const TIKTOK_AUTHORIZE_URL: &str = "https://www.tiktok.com/v2/auth/authorize/";
pub const TIKTOK_TOKEN_URL: &str = "https://open.tiktokapis.com/v2/oauth/token/";

/// Scopes needed to read the creator profile and publish on their behalf
pub const SCOPES: &str = "user.info.basic,video.upload,video.publish";

const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TikTokOAuthClient {
    client_key: String,
    client_secret: String,
    redirect_uri: String,
    authorize_url: String,
    token_url: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl TikTokOAuthClient {
    pub fn new(client_key: String, client_secret: String, redirect_uri: String) -> Self {
        Self::with_endpoints(
            client_key,
            client_secret,
            redirect_uri,
            TIKTOK_AUTHORIZE_URL.to_string(),
            TIKTOK_TOKEN_URL.to_string(),
        )
    }

    /// Point the client at non-default endpoints (sandbox or test doubles)
    pub fn with_endpoints(
        client_key: String,
        client_secret: String,
        redirect_uri: String,
        authorize_url: String,
        token_url: String,
    ) -> Self {
        Self {
            client_key,
            client_secret,
            redirect_uri,
            authorize_url,
            token_url,
            timeout: TOKEN_TIMEOUT,
            http_client: reqwest::Client::new(),
        }
    }

    /// Override the per-call timeout of the token endpoint
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate the TikTok authorization URL for the given CSRF state
    pub fn get_authorization_url(&self, state: &str) -> String {
        build_authorization_url(&self.authorize_url, &self.client_key, &self.redirect_uri, state)
    }

    /// Exchange an authorization code for an access/refresh token pair
    pub async fn exchange_code(&self, code: &str) -> AppResult<Token> {
        let params = [
            ("client_key", self.client_key.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        self.request_token(&params, "TikTok token exchange").await
    }

    /// Trade a refresh token for a new token
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<Token> {
        let params = [
            ("client_key", self.client_key.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        self.request_token(&params, "TikTok token refresh").await
    }

    async fn request_token(&self, params: &[(&str, &str)], context: &str) -> AppResult<Token> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::from_transport(context, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = status.as_u16(), "{} rejected", context);
            return Err(AppError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let token_response = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("Failed to parse TikTok token: {}", e))
            })?;

        let token = Token::issue(token_response, Utc::now().timestamp())?;
        tracing::debug!(
            expires_at = ?token.expires_at,
            has_refresh_token = token.refresh_token.is_some(),
            "{} succeeded",
            context
        );

        Ok(token)
    }
}

#[async_trait]
impl TokenRefresher for TikTokOAuthClient {
    async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<Token> {
        self.refresh_token(refresh_token).await
    }
}

/// Build the authorization redirect. Pure: same inputs, same URL.
pub fn build_authorization_url(
    authorize_url: &str,
    client_key: &str,
    redirect_uri: &str,
    state: &str,
) -> String {
    format!(
        "{}?client_key={}&scope={}&response_type=code&redirect_uri={}&state={}",
        authorize_url,
        urlencoding::encode(client_key),
        urlencoding::encode(SCOPES),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(state)
    )
}
