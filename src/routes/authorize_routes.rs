//! Endpoints that start the Spotify authorization flow.

use axum::extract::State;
use axum::response::Redirect;
use axum::{routing::get, Json, Router};
use tracing::info;

use crate::oauth::{AuthorizationRequest, ConnectionState};
use crate::state::AppState;
use crate::utils::http_helpers::CallerContext;

/// Registers authorization routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/spotify/authorize", get(authorize_redirect))
        .route("/api/spotify/authorize-url", get(authorize_url))
}

fn build_request(ctx: &CallerContext, state: &AppState) -> AuthorizationRequest {
    let request = state.auth.authorizer.build(ctx.host());
    info!(
        event_name = "oauth.authorize.started",
        event_domain = "oauth",
        client_ip = ctx.client_ip.as_str(),
        redirect_uri = request.redirect_uri.as_str(),
        connection_state = ?ConnectionState::AuthorizationRequested,
        "sending user to the Spotify consent screen"
    );
    request
}

/// Sends the browser straight to the consent screen.
async fn authorize_redirect(ctx: CallerContext, State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&build_request(&ctx, &state).url)
}

/// Returns the consent URL for clients that open it in a popup themselves.
async fn authorize_url(
    ctx: CallerContext,
    State(state): State<AppState>,
) -> Json<AuthorizationRequest> {
    Json(build_request(&ctx, &state))
}
