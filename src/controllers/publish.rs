use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    domain::{
        auth::{Token, TokenService},
        publish::{PublishService, DEFAULT_PRIVACY_LEVEL},
    },
    error::{AppError, AppResult},
    infrastructure::session::{Session, SessionData},
};

#[derive(Debug, Deserialize)]
pub struct PublishForm {
    pub video_filename: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default = "default_privacy_level")]
    pub privacy_level: String,
}

fn default_privacy_level() -> String {
    DEFAULT_PRIVACY_LEVEL.to_string()
}

/// Response for GET /publish
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishPageResponse {
    pub nickname: Option<String>,
    pub username: Option<String>,
    pub privacy_level_options: Vec<String>,
    pub videos: Vec<String>,
    pub video_base: String,
}

pub struct PublishController {
    token_service: Arc<TokenService>,
    publish_service: Arc<PublishService>,
}

impl PublishController {
    pub fn new(token_service: Arc<TokenService>, publish_service: Arc<PublishService>) -> Self {
        Self {
            token_service,
            publish_service,
        }
    }

    /// GET /publish - Creator profile and the videos that can be posted
    pub async fn publish_page(
        State(controller): State<Arc<PublishController>>,
        Extension(session): Extension<Session>,
    ) -> AppResult<Response> {
        let mut data = session.load().await;
        let Some(token) = controller.fresh_token(&session, &mut data).await? else {
            return Ok(Redirect::temporary("/").into_response());
        };

        let info = controller
            .publish_service
            .creator_info(&token.access_token)
            .await?;

        Ok(Json(PublishPageResponse {
            nickname: info.nickname,
            username: info.username,
            privacy_level_options: info.privacy_level_options,
            videos: controller.publish_service.available_videos().to_vec(),
            video_base: controller.publish_service.video_base_url().to_string(),
        })
        .into_response())
    }

    /// POST /publish - Ask TikTok to pull one of the hosted videos
    ///
    /// Rejections carried in TikTok's error envelope are stored as the
    /// result and shown on /done; transport and HTTP failures fail the request.
    pub async fn publish(
        State(controller): State<Arc<PublishController>>,
        Extension(session): Extension<Session>,
        Form(form): Form<PublishForm>,
    ) -> AppResult<Response> {
        let mut data = session.load().await;
        if !data.is_connected() {
            return Ok(Redirect::to("/").into_response());
        }

        // Validate before spending a refresh on a request that cannot succeed
        controller.publish_service.video_url(&form.video_filename)?;

        let Some(token) = controller.fresh_token(&session, &mut data).await? else {
            return Ok(Redirect::to("/").into_response());
        };

        let outcome = controller
            .publish_service
            .publish(
                &token.access_token,
                &form.video_filename,
                &form.caption,
                &form.privacy_level,
            )
            .await;

        data.last_result = Some(match outcome {
            Ok(result) => result.into_inner(),
            Err(AppError::RemoteApi {
                code,
                message,
                log_id,
            }) => json!({
                "error": { "code": code, "message": message, "log_id": log_id }
            }),
            Err(err) => return Err(err),
        });
        session.save(data).await;

        Ok(Redirect::to("/done").into_response())
    }

    /// GET /done - Outcome of the last publish attempt
    pub async fn done(Extension(session): Extension<Session>) -> impl IntoResponse {
        let data = session.load().await;
        Json(json!({
            "connected": data.is_connected(),
            "result": data.last_result.unwrap_or(Value::Null),
        }))
    }

    /// Refresh the session token if needed and write it back
    async fn fresh_token(
        &self,
        session: &Session,
        data: &mut SessionData,
    ) -> AppResult<Option<Token>> {
        let Some(token) = data.token.take() else {
            return Ok(None);
        };

        let token = self.token_service.ensure_fresh(token).await?;
        data.token = Some(token.clone());
        session.save(data.clone()).await;

        Ok(Some(token))
    }
}
