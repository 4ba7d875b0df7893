use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Upstream answered with a non-success HTTP status.
    #[error("Upstream returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Upstream answered successfully but embedded a failure code in its envelope.
    #[error("{code}: {message} (log_id={})", .log_id.as_deref().unwrap_or("none"))]
    RemoteApi {
        code: String,
        message: String,
        log_id: Option<String>,
    },

    #[error("Invalid state")]
    StateMismatch,

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure - simplified to just message + status code
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::StateMismatch | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Http { .. } | Self::RemoteApi { .. } | Self::ExternalService(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to simplified error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }

    /// Map a transport-level reqwest failure, calling out timeouts explicitly
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::ExternalService(format!("{} timed out", context))
        } else {
            Self::ExternalService(format!("{} failed: {}", context, err))
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(
            error = %self,
            status = %status.as_u16(),
            "Request failed"
        );

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
