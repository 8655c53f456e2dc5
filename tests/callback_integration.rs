mod common;

use std::collections::HashMap;

use axum::http::{Method, StatusCode};
use common::*;
use mockito::{Matcher, Server};
use tower::ServiceExt;
use url::Url;
use vibeauth::oauth::StateToken;

const TOKEN_BODY: &str =
    r#"{"access_token":"AT1","token_type":"Bearer","expires_in":3600,"refresh_token":"RT1","scope":"user-read-private user-read-email user-top-read"}"#;

fn callback_path(code: &str, state: &str) -> String {
    format!(
        "/api/auth/callback/spotify?code={}&state={}",
        encode_query_value(code),
        encode_query_value(state)
    )
}

#[tokio::test]
async fn integration_fresh_login_sets_cookies() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/token")
        .match_header("authorization", BASIC_AUTH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "abc".into()),
            Matcher::UrlEncoded("redirect_uri".into(), PRODUCTION_REDIRECT.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOKEN_BODY)
        .expect(1)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));
    let state = StateToken::new("AbCdEfGh", PRODUCTION_REDIRECT).encode();

    let response = app
        .oneshot(browser_request(
            Method::GET,
            &callback_path("abc", &state),
            "app.example",
            &[],
        ))
        .await
        .expect("request should succeed");

    m.assert_async().await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/profile");
    assert_eq!(
        set_cookies(&response),
        vec![
            "access_token=AT1; Max-Age=3600; Path=/; HttpOnly; Secure; SameSite=Lax".to_string(),
            "refresh_token=RT1; Max-Age=2592000; Path=/; HttpOnly; Secure; SameSite=Lax"
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn integration_consent_denied_skips_token_endpoint() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/token")
        .expect(0)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));
    let response = app
        .oneshot(browser_request(
            Method::GET,
            "/api/auth/callback/spotify?error=access_denied&state=abc",
            "app.example",
            &[],
        ))
        .await
        .expect("request should complete");

    m.assert_async().await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/connect-spotify?error=access_denied");
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn integration_missing_code_is_treated_as_denial() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/token")
        .expect(0)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));
    let response = app
        .oneshot(browser_request(
            Method::GET,
            "/api/spotify/callback",
            "app.example",
            &[],
        ))
        .await
        .expect("request should complete");

    m.assert_async().await;
    assert_eq!(location(&response), "/connect-spotify?error=access_denied");
}

#[tokio::test]
async fn integration_rejected_code_redirects_with_token_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));
    let response = app
        .oneshot(browser_request(
            Method::GET,
            "/api/auth/callback/spotify?code=already-used",
            "app.example",
            &[],
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/connect-spotify?error=token_error");
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn integration_embedded_caller_returns_to_mini_app() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));
    let response = app
        .oneshot(browser_request(
            Method::GET,
            "/api/auth/callback/spotify?code=abc",
            "app.example",
            &[("Referer", "https://warpcast.com/~/developers/mini-apps")],
        ))
        .await
        .expect("request should complete");

    assert_eq!(location(&response), MINI_APP_URL);
    assert_eq!(set_cookies(&response).len(), 2);
}

#[tokio::test]
async fn integration_garbage_state_falls_back_to_host() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/token")
        .match_body(Matcher::UrlEncoded(
            "redirect_uri".into(),
            LOCAL_REDIRECT.into(),
        ))
        .with_status(200)
        .with_body(TOKEN_BODY)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));
    let response = app
        .oneshot(browser_request(
            Method::GET,
            &callback_path("abc", "nonce.***not-base64***"),
            "localhost:3000",
            &[],
        ))
        .await
        .expect("request should complete");

    m.assert_async().await;
    assert_eq!(location(&response), "/profile");
}

#[tokio::test]
async fn integration_authorize_then_callback_reuses_redirect_uri() {
    let mut server = Server::new_async().await;
    // The flow starts on a developer machine but the callback is served elsewhere;
    // the exchange must still present the local redirect URI.
    let m = server
        .mock("POST", "/api/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("code".into(), "fresh-code".into()),
            Matcher::UrlEncoded("redirect_uri".into(), LOCAL_REDIRECT.into()),
        ]))
        .with_status(200)
        .with_body(TOKEN_BODY)
        .expect(1)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));

    let response = app
        .clone()
        .oneshot(browser_request(
            Method::GET,
            "/api/spotify/authorize",
            "localhost:3000",
            &[],
        ))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let consent = Url::parse(&location(&response)).expect("Location should be absolute");
    assert_eq!(consent.path(), "/authorize");
    let params: HashMap<String, String> = consent.query_pairs().into_owned().collect();
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["client_id"], "client-123");
    assert_eq!(
        params["scope"],
        "user-read-private user-read-email user-top-read"
    );
    assert_eq!(params["redirect_uri"], LOCAL_REDIRECT);

    let state = &params["state"];
    let (nonce, _) = state.rsplit_once('.').expect("state should have a delimiter");
    assert_eq!(nonce.len(), 16);
    assert_eq!(
        StateToken::decode_redirect_uri(state).as_deref(),
        Some(LOCAL_REDIRECT)
    );

    let response = app
        .oneshot(browser_request(
            Method::GET,
            &callback_path("fresh-code", state),
            "tunnel.example",
            &[],
        ))
        .await
        .expect("request should complete");

    m.assert_async().await;
    assert_eq!(location(&response), "/profile");
}

#[tokio::test]
async fn integration_authorize_url_is_available_as_json() {
    let server = Server::new_async().await;
    let app = build_app(load_test_config(&server.url()));

    let response = app
        .oneshot(browser_request(
            Method::GET,
            "/api/spotify/authorize-url",
            "app.example",
            &[],
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["redirect_uri"], PRODUCTION_REDIRECT);
    let url = body["url"].as_str().expect("url should be a string");
    assert!(url.starts_with(&format!("{}/authorize?", server.url())));
}

#[tokio::test]
async fn integration_unparseable_callback_query_still_redirects() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/token")
        .expect(0)
        .create_async()
        .await;

    let app = build_app(load_test_config(&server.url()));
    let response = app
        .oneshot(browser_request(
            Method::GET,
            "/api/auth/callback/spotify?code=a&code=b",
            "app.example",
            &[],
        ))
        .await
        .expect("request should complete");

    m.assert_async().await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/connect-spotify?error=access_denied");
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn integration_unparseable_query_from_mini_app_returns_there() {
    let server = Server::new_async().await;
    let app = build_app(load_test_config(&server.url()));

    let response = app
        .oneshot(browser_request(
            Method::GET,
            "/api/spotify/callback?state=x&state=y",
            "app.example",
            &[("Referer", "https://warpcast.com/")],
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let target = Url::parse(&location(&response)).expect("absolute mini-app URL");
    assert_eq!(target.host_str(), Some("warpcast.com"));
    assert!(target
        .query_pairs()
        .any(|(k, v)| k == "error" && v == "access_denied"));
}

#[tokio::test]
async fn integration_redirect_uri_follows_first_forwarded_host() {
    let server = Server::new_async().await;
    let app = build_app(load_test_config(&server.url()));

    for (forwarded, expected) in [
        ("localhost:3000, proxy.internal", LOCAL_REDIRECT),
        ("LOCALHOST:3000", LOCAL_REDIRECT),
        ("app.example, localhost", PRODUCTION_REDIRECT),
    ] {
        let response = app
            .clone()
            .oneshot(browser_request(
                Method::GET,
                "/api/spotify/authorize-url",
                "internal.service",
                &[("X-Forwarded-Host", forwarded)],
            ))
            .await
            .expect("request should complete");

        let body = json_body(response).await;
        assert_eq!(body["redirect_uri"], expected, "forwarded host {}", forwarded);
    }
}
