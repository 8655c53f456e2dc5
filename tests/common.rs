#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::Value;
use vibeauth::config::{extract_config, ConfigV1};
use vibeauth::routes::create_router;
use vibeauth::startup::build_state;

pub const LOCAL_REDIRECT: &str = "http://localhost:3000/api/auth/callback/spotify";
pub const PRODUCTION_REDIRECT: &str = "https://app.example/callback";
pub const MINI_APP_URL: &str =
    "https://warpcast.com/~/developers/mini-apps/preview?url=https://app.example";
// base64("client-123:s3cret")
pub const BASIC_AUTH: &str = "Basic Y2xpZW50LTEyMzpzM2NyZXQ=";

pub fn load_test_config(accounts_url: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
bind_address: 127.0.0.1:8083
logging:
  level: "warn"
  format: "json"
spotify:
  client_id: client-123
  client_secret: s3cret
  accounts_url: "{accounts_url}"
  timeout_in_ms: 3000
  redirect_uris:
    local: "{LOCAL_REDIRECT}"
    production: "{PRODUCTION_REDIRECT}"
app:
  embedded:
    hosts:
      - warpcast.com
    app_url: "{MINI_APP_URL}"
"#
    );

    extract_config(&Figment::new().merge(Yaml::string(&yaml)))
        .expect("Failed to parse test config YAML")
}

pub fn build_app(config: ConfigV1) -> Router {
    let state = build_state(Arc::new(config)).expect("test config should build");
    create_router(state)
}

/// A request as a browser would send it: addressed to `host`, with optional extra headers.
pub fn browser_request(
    method: Method,
    path: &str,
    host: &str,
    headers: &[(&str, &str)],
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("Host", host);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let mut request = builder.body(Body::empty()).expect("failed to build request");

    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        0,
    )));

    request
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(LOCATION)
        .expect("Location header missing")
        .to_str()
        .expect("Location header not valid UTF-8")
        .to_string()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("cookie not valid UTF-8").to_string())
        .collect()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not JSON")
}

/// Percent-encodes a value for use in a query string.
pub fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
