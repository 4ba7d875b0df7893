use crate::error::{AppError, AppResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Token payload as returned by the token endpoint, for both the
/// authorization-code and refresh-token grants
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub expires_in: Option<i64>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub refresh_expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub open_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    // Error envelope, sent with HTTP 200 on a rejected grant
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub log_id: Option<String>,
}

/// An issued access token. Values are replaced wholesale on refresh,
/// never patched field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    /// Unix seconds; always `issued_at + expires_in`
    pub expires_at: Option<i64>,
    pub token_type: Option<String>,
    pub open_id: Option<String>,
    pub scope: Option<String>,
    pub refresh_expires_in: Option<i64>,
}

impl Token {
    /// Build a token from an upstream response, stamping the absolute expiry
    /// relative to `issued_at`.
    pub fn issue(response: TokenResponse, issued_at: i64) -> AppResult<Self> {
        if let Some(code) = response.error.filter(|code| !code.is_empty()) {
            return Err(AppError::RemoteApi {
                code,
                message: response.error_description.unwrap_or_default(),
                log_id: response.log_id,
            });
        }

        let access_token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::ExternalService("Token response is missing access_token".to_string())
            })?;

        Ok(Self {
            access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            // An expiry past the representable range is treated as malformed
            expires_at: response
                .expires_in
                .and_then(|secs| issued_at.checked_add(secs)),
            token_type: response.token_type,
            open_id: response.open_id,
            scope: response.scope,
            refresh_expires_in: response.refresh_expires_in,
        })
    }

    /// True when the token needs no refresh at `now`: either its expiry is
    /// unknown or it lies more than `skew_secs` in the future.
    pub fn is_fresh(&self, now: i64, skew_secs: i64) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => now < expires_at.saturating_sub(skew_secs),
        }
    }

    /// Refresh token, if one is present and non-empty
    pub fn usable_refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|rt| !rt.is_empty())
    }

    /// Keep the previous refresh token when the refresh response omitted one.
    pub fn carry_forward_refresh_token(self, previous: &Token) -> Self {
        if self.usable_refresh_token().is_some() {
            return self;
        }
        Self {
            refresh_token: previous.usable_refresh_token().map(str::to_string),
            ..self
        }
    }
}

/// Accept seconds as a JSON number or a numeric string; anything else is treated as absent.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
