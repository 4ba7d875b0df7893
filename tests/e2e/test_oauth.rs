use crate::e2e::helpers;

use helpers::fake_tiktok::TOKEN_PATH;
use helpers::{query_pairs, TestContext, CLIENT_KEY, CLIENT_SECRET, REDIRECT_URI};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use test_context::test_context;
use tiktok_publisher::infrastructure::oauth::tiktok::SCOPES;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_redirect_login_to_tiktok_authorize(ctx: &TestContext) {
    let response = ctx.client.get("/tiktok/login").await.unwrap();

    let location = response.assert_redirect(StatusCode::TEMPORARY_REDIRECT);
    assert!(
        location.starts_with(&ctx.tiktok.url("/v2/auth/authorize/")),
        "Location should point to the authorize endpoint, got: {}",
        location
    );

    let mut params = query_pairs(location);
    params.sort();
    let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["client_key", "redirect_uri", "response_type", "scope", "state"]);

    let params: HashMap<String, String> = params.into_iter().collect();
    assert_eq!(params["client_key"], CLIENT_KEY);
    assert_eq!(params["redirect_uri"], REDIRECT_URI);
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["scope"], SCOPES);
    assert!(!params["state"].is_empty());

    assert!(ctx.client.session_cookie().is_some(), "Login should open a session");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_issue_a_new_state_per_login(ctx: &TestContext) {
    let first = ctx.login().await.unwrap();
    let second = ctx.login().await.unwrap();

    assert_ne!(first, second);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_exchange_code_with_client_credentials(ctx: &TestContext) {
    let response = ctx.connect().await.unwrap();

    let location = response.assert_redirect(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location, "/publish");

    let requests = ctx.tiktok.requests_to(TOKEN_PATH);
    assert_eq!(requests.len(), 1);

    let expected: HashMap<String, String> = [
        ("client_key", CLIENT_KEY),
        ("client_secret", CLIENT_SECRET),
        ("code", "auth-code"),
        ("grant_type", "authorization_code"),
        ("redirect_uri", REDIRECT_URI),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(requests[0].form, expected);

    let home = ctx.client.get("/").await.unwrap();
    home.assert_status(StatusCode::OK);
    assert_eq!(home.json(), &json!({"connected": true}));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_callback_with_mismatched_state(ctx: &TestContext) {
    ctx.login().await.unwrap();

    let response = ctx
        .client
        .get("/tiktok/callback?code=auth-code&state=forged")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid state");
    assert_eq!(ctx.tiktok.request_count(), 0, "No exchange may happen on a bad state");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_callback_without_pending_login(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/tiktok/callback?code=auth-code&state=anything")
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.tiktok.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_callback_from_another_browser(ctx: &TestContext) {
    let state = ctx.login().await.unwrap();
    ctx.client.forget_session();

    let response = ctx
        .client
        .get(&format!("/tiktok/callback?code=auth-code&state={}", state))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.tiktok.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_each_state_only_once(ctx: &TestContext) {
    let state = ctx.login().await.unwrap();
    let callback = format!("/tiktok/callback?code=auth-code&state={}", state);

    ctx.client
        .get(&callback)
        .await
        .unwrap()
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    ctx.client
        .get(&callback)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(ctx.tiktok.requests_to(TOKEN_PATH).len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_callback_when_user_denied_access(ctx: &TestContext) {
    let state = ctx.login().await.unwrap();

    let response = ctx
        .client
        .get(&format!(
            "/tiktok/callback?state={}&error=access_denied&error_description=User+cancelled",
            state
        ))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("access_denied");
    assert_eq!(ctx.tiktok.request_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_token_endpoint_http_errors(ctx: &TestContext) {
    ctx.tiktok.push_token_response(
        StatusCode::BAD_REQUEST,
        json!({"error": "invalid_request", "error_description": "bad code"}),
    );

    let response = ctx.connect().await.unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("HTTP 400");

    let home = ctx.client.get("/").await.unwrap();
    assert_eq!(home.json(), &json!({"connected": false}));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_token_error_envelope(ctx: &TestContext) {
    ctx.tiktok.push_token_response(
        StatusCode::OK,
        json!({
            "error": "invalid_grant",
            "error_description": "Authorization code is expired.",
            "log_id": "log-123"
        }),
    );

    let response = ctx.connect().await.unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("invalid_grant: Authorization code is expired. (log_id=log-123)");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forget_token_on_logout(ctx: &TestContext) {
    ctx.connect().await.unwrap();

    let response = ctx.client.get("/logout").await.unwrap();
    let location = response.assert_redirect(StatusCode::SEE_OTHER);
    assert_eq!(location, "/");

    let home = ctx.client.get("/").await.unwrap();
    assert_eq!(home.json(), &json!({"connected": false}));
}
