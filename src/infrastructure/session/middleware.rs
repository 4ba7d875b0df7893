use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::store::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "tiktok_session";

/// State for [`session_middleware`]
#[derive(Clone)]
pub struct SessionLayer {
    pub store: SessionStore,
    /// Mark the cookie `Secure` (production deployments behind HTTPS)
    pub secure_cookie: bool,
}

/// Middleware that resolves the session cookie and attaches a [`Session`] to the request
pub async fn session_middleware(
    State(layer): State<SessionLayer>,
    mut request: Request,
    next: Next,
) -> Response {
    // Unknown or expired ids get a fresh session rather than being adopted
    let mut existing = cookie_value(request.headers(), SESSION_COOKIE);
    if let Some(id) = &existing {
        if layer.store.load(id).await.is_none() {
            existing = None;
        }
    }

    let is_new = existing.is_none();
    let session_id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(Session::new(session_id.clone(), layer.store.clone()));

    let mut response = next.run(request).await;

    if is_new {
        let cookie = session_cookie(&session_id, layer.secure_cookie);
        if let Ok(header_value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, header_value);
        }
    }

    response
}

fn session_cookie(session_id: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session_id);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find a cookie by name across all `Cookie` headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
