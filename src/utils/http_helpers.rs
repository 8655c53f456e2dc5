use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::{HOST, REFERER};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::oauth::{InvocationOrigin, OAuthError};
use crate::state::AppState;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Converts our `HTTPError` into a JSON HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<OAuthError> for HTTPError {
    fn from(e: OAuthError) -> Self {
        let status = match &e {
            OAuthError::ConsentDenied { .. }
            | OAuthError::MissingCode
            | OAuthError::EmptyInput { .. } => StatusCode::BAD_REQUEST,
            OAuthError::RefreshRejected { .. } => StatusCode::UNAUTHORIZED,
            OAuthError::Transport(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            OAuthError::UpstreamToken { .. }
            | OAuthError::Transport(_)
            | OAuthError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        };
        HTTPError::new(status, e.to_string())
    }
}

/// Facts about the caller that the flow depends on, gathered once at the HTTP edge.
#[derive(Debug, Clone)]
pub struct CallerContext {
    /// Host the request was addressed to (proxy-forwarded host preferred), port included.
    pub host: Option<String>,
    pub origin: InvocationOrigin,
    pub client_ip: String,
}

impl CallerContext {
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Proxies append to `X-Forwarded-Host`; the first entry is the host the client asked for.
fn first_forwarded_value(value: &str) -> Option<&str> {
    value
        .split(',')
        .next()
        .map(str::trim)
        .filter(|host| !host.is_empty())
}

/// Extractor implementation: never rejects, missing pieces simply stay unknown.
#[async_trait]
impl FromRequestParts<AppState> for CallerContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<CallerContext, Infallible> {
        let host = header_str(parts, "x-forwarded-host")
            .and_then(first_forwarded_value)
            .or_else(|| header_str(parts, HOST.as_str()))
            .map(str::to_string);

        let embedded_hosts = state
            .config
            .app
            .embedded
            .as_ref()
            .map(|e| e.hosts.as_slice())
            .unwrap_or_default();
        let origin =
            InvocationOrigin::from_referer(header_str(parts, REFERER.as_str()), embedded_hosts);

        // Get the client IP for logging purposes
        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| {
                tracing::warn!("Unable to determine client IP address.");
                "unknown".to_string()
            });

        Ok(CallerContext {
            host,
            origin,
            client_ip,
        })
    }
}
