use super::Token;
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Refresh proactively this many seconds before the hard expiry
pub const DEFAULT_REFRESH_SKEW_SECS: i64 = 300;

/// Something that can trade a refresh token for a new access token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<Token>;
}

pub struct TokenService {
    refresher: Arc<dyn TokenRefresher>,
    skew_secs: i64,
}

impl TokenService {
    pub fn new(refresher: Arc<dyn TokenRefresher>) -> Self {
        Self::with_skew(refresher, DEFAULT_REFRESH_SKEW_SECS)
    }

    pub fn with_skew(refresher: Arc<dyn TokenRefresher>, skew_secs: i64) -> Self {
        Self {
            refresher,
            skew_secs,
        }
    }

    /// Return a token that is safe to use right now, refreshing it if it is
    /// about to expire
    pub async fn ensure_fresh(&self, token: Token) -> AppResult<Token> {
        self.ensure_fresh_at(token, Utc::now().timestamp()).await
    }

    /// Same as [`ensure_fresh`](Self::ensure_fresh) with an explicit clock.
    ///
    /// Tokens with unknown expiry, or still outside the skew window, come
    /// back unchanged. A stale token with no refresh token is also returned
    /// as-is; the upstream call will reject it if it really expired.
    pub async fn ensure_fresh_at(&self, token: Token, now: i64) -> AppResult<Token> {
        if token.is_fresh(now, self.skew_secs) {
            return Ok(token);
        }

        let Some(refresh_token) = token.usable_refresh_token() else {
            tracing::warn!(
                expires_at = ?token.expires_at,
                "Access token is stale and no refresh token is available"
            );
            return Ok(token);
        };

        tracing::info!(expires_at = ?token.expires_at, "Refreshing access token");
        let refreshed = self.refresher.refresh_access_token(refresh_token).await?;

        Ok(refreshed.carry_forward_refresh_token(&token))
    }
}
