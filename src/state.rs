//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration and the Spotify flow components.

use crate::config::ConfigV1;
use crate::oauth::SpotifyAuth;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Nothing in here changes after startup; tokens only ever live in browser cookies.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Authorization URL builder, token exchanger and refresher.
    pub auth: Arc<SpotifyAuth>,
}
