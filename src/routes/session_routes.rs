//! Connection status and access token refresh, driven entirely by the token cookies.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::oauth::cookies::{access_token_cookie, clearing_cookies, read_cookie, refresh_token_cookie};
use crate::oauth::ConnectionState;
use crate::state::AppState;
use crate::utils::http_helpers::{CallerContext, HTTPError};

/// Registers session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/spotify/status", get(status))
        .route("/api/spotify/refresh", post(refresh))
}

#[derive(Serialize)]
struct StatusResponse {
    connected: bool,
    state: ConnectionState,
}

#[derive(Serialize)]
struct RefreshResponse {
    connected: bool,
    state: ConnectionState,
    expires_in: u64,
}

/// The page cannot read http-only cookies, so it asks here.
async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<StatusResponse> {
    let cookies = &state.config.cookies;
    let connection = ConnectionState::from_cookies(
        read_cookie(&headers, &cookies.access_token_name).is_some(),
        read_cookie(&headers, &cookies.refresh_token_name).is_some(),
    );
    Json(StatusResponse {
        connected: connection.is_connected(),
        state: connection,
    })
}

/// Swaps the refresh cookie for a new access cookie.
///
/// A rejected refresh token clears both cookies and answers 401 so the page
/// restarts the authorization flow.
async fn refresh(
    ctx: CallerContext,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HTTPError> {
    let cookies = &state.config.cookies;
    let refresh_token = read_cookie(&headers, &cookies.refresh_token_name).ok_or_else(|| {
        HTTPError::new(StatusCode::UNAUTHORIZED, "No Spotify refresh token found")
    })?;

    match state.auth.refresher.refresh(&refresh_token).await {
        Ok(token) => {
            let mut set_cookies = vec![access_token_cookie(
                cookies,
                &token.access_token,
                token.expires_in,
            )];
            if let Some(rotated) = &token.refresh_token {
                set_cookies.push(refresh_token_cookie(cookies, rotated));
            }
            Ok((
                AppendHeaders(set_cookies.into_iter().map(|c| (SET_COOKIE, c))),
                Json(RefreshResponse {
                    connected: true,
                    state: ConnectionState::Authenticated,
                    expires_in: token.expires_in,
                }),
            )
                .into_response())
        }
        Err(e) if e.requires_reauthorization() => {
            info!(
                event_name = "oauth.refresh.connection_lost",
                event_domain = "oauth",
                client_ip = ctx.client_ip.as_str(),
                connection_state = ?ConnectionState::Unauthenticated,
                "refresh token rejected; clearing token cookies"
            );
            let [access, refresh] = clearing_cookies(cookies);
            Ok((
                AppendHeaders([(SET_COOKIE, access), (SET_COOKIE, refresh)]),
                HTTPError::new(StatusCode::UNAUTHORIZED, "Spotify connection lost"),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
