//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! starting the authorization flow, the Spotify callback, cookie-backed
//! session endpoints and health checks.

mod authorize_routes;
mod callback_routes;
mod health_routes;
mod session_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(authorize_routes::routes())
        .merge(callback_routes::routes())
        .merge(session_routes::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
