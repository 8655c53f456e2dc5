//! Health check endpoints.

use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness only: the service holds no state and does not probe Spotify.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
