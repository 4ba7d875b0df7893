use anyhow::Result;
use http_body_util::{BodyExt, Full};
use hyper::{body::Bytes, Method, Request, Response, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tiktok_publisher::infrastructure::session::SESSION_COOKIE;

/// Browser-like client: does not follow redirects, replays the session cookie
#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: Client<hyper_util::client::legacy::connect::HttpConnector, Full<Bytes>>,
    session_cookie: Arc<Mutex<Option<String>>>,
}

impl TestClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            base_url: base_url.to_string(),
            client,
            session_cookie: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, None).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<ApiResponse> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.request(Method::POST, path, Some(body)).await
    }

    pub fn session_cookie(&self) -> Option<String> {
        self.session_cookie.lock().unwrap().clone()
    }

    pub fn forget_session(&self) {
        *self.session_cookie.lock().unwrap() = None;
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        form_body: Option<String>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut req_builder = Request::builder().method(method).uri(&url);

        if let Some(session_id) = self.session_cookie() {
            req_builder =
                req_builder.header("Cookie", format!("{}={}", SESSION_COOKIE, session_id));
        }

        let body_bytes = if let Some(body) = form_body {
            req_builder = req_builder.header("Content-Type", "application/x-www-form-urlencoded");
            Full::new(Bytes::from(body))
        } else {
            Full::new(Bytes::new())
        };

        let request = req_builder.body(body_bytes)?;
        let response = self.client.request(request).await?;
        let response = ApiResponse::from_response(response).await?;

        if let Some(session_id) = response.set_session_cookie() {
            *self.session_cookie.lock().unwrap() = Some(session_id);
        }

        Ok(response)
    }
}

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub body_bytes: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl ApiResponse {
    async fn from_response(response: Response<hyper::body::Incoming>) -> Result<Self> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body_bytes = response.into_body().collect().await?.to_bytes().to_vec();

        let body = if !body_bytes.is_empty() {
            serde_json::from_slice(&body_bytes).ok()
        } else {
            None
        };

        Ok(Self {
            status,
            body,
            body_bytes,
            headers,
        })
    }

    fn set_session_cookie(&self) -> Option<String> {
        let cookie = self.headers.get("set-cookie")?;
        let (pair, _) = cookie.split_once(';').unwrap_or((cookie.as_str(), ""));
        let (name, value) = pair.split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {}. Body: {:?}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert that the error response contains the expected message
    pub fn assert_error_message(&self, expected_message: &str) -> &Self {
        let message = self
            .body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(|m| m.as_str())
            .expect("Missing message field in error response");

        assert!(
            message.contains(expected_message),
            "Expected error message to contain '{}', but got '{}'",
            expected_message,
            message
        );
        self
    }

    /// Assert a redirect and return its target
    pub fn assert_redirect(&self, expected: StatusCode) -> &str {
        self.assert_status(expected);
        self.header("location")
            .map(String::as_str)
            .expect("Missing Location header")
    }

    pub fn json(&self) -> &Value {
        self.body.as_ref().expect("Response body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Expected header '{}' to be present",
            name
        );
        self
    }
}
