//! The redirect target registered with Spotify.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::{routing::get, Router};
use tracing::{info, warn};

use crate::oauth::cookies::token_pair_cookies;
use crate::oauth::{CallbackFailure, CallbackParams, ConnectionState};
use crate::state::AppState;
use crate::utils::http_helpers::CallerContext;

/// Registers the callback under both paths registered in the Spotify dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/callback/spotify", get(spotify_callback))
        .route("/api/spotify/callback", get(spotify_callback))
}

/// Exchanges the code, stores the tokens as cookies and sends the browser back to the app.
///
/// Every outcome is a redirect; failures carry `error=access_denied` or
/// `error=token_error` so the app can show what happened.
async fn spotify_callback(
    ctx: CallerContext,
    State(state): State<AppState>,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Response {
    let redirects = &state.auth.redirects;

    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(
                event_name = "oauth.callback.malformed_query",
                event_domain = "oauth",
                client_ip = ctx.client_ip.as_str(),
                origin = ?ctx.origin,
                connection_state = ?ConnectionState::Unauthenticated,
                "callback query could not be parsed: {}",
                rejection
            );
            let target = redirects.failure(ctx.origin, CallbackFailure::AccessDenied);
            return Redirect::temporary(&target).into_response();
        }
    };

    let code = match params.authorization_code() {
        Ok(code) => code,
        Err(e) => {
            info!(
                event_name = "oauth.callback.denied",
                event_domain = "oauth",
                client_ip = ctx.client_ip.as_str(),
                origin = ?ctx.origin,
                connection_state = ?ConnectionState::Unauthenticated,
                "callback ended without a code: {}",
                e
            );
            let target = redirects.failure(ctx.origin, CallbackFailure::from(&e));
            return Redirect::temporary(&target).into_response();
        }
    };

    match state
        .auth
        .exchanger
        .exchange(code, params.state.as_deref(), ctx.host())
        .await
    {
        Ok(pair) => {
            let target = redirects.success(ctx.origin);
            info!(
                event_name = "oauth.callback.connected",
                event_domain = "oauth",
                client_ip = ctx.client_ip.as_str(),
                origin = ?ctx.origin,
                connection_state = ?ConnectionState::Authenticated,
                redirect_to = target.as_str(),
                "Spotify account connected"
            );
            let [access, refresh] = token_pair_cookies(&state.config.cookies, &pair);
            (
                AppendHeaders([(SET_COOKIE, access), (SET_COOKIE, refresh)]),
                Redirect::temporary(&target),
            )
                .into_response()
        }
        Err(e) => {
            warn!(
                event_name = "oauth.callback.exchange_failed",
                event_domain = "oauth",
                client_ip = ctx.client_ip.as_str(),
                origin = ?ctx.origin,
                connection_state = ?ConnectionState::Unauthenticated,
                "Error exchanging code for token: {}",
                e
            );
            let target = redirects.failure(ctx.origin, CallbackFailure::from(&e));
            Redirect::temporary(&target).into_response()
        }
    }
}
