//! Application startup and server initialization.
//!
//! This module builds the Spotify flow components from configuration and
//! serves the HTTP routes.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::oauth::{ConfigError, SpotifyAuth};
use crate::routes;
use crate::state::AppState;

/// Builds the shared application state against the real Spotify token endpoint.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, ConfigError> {
    let auth = Arc::new(SpotifyAuth::new(&config)?);
    Ok(AppState { config, auth })
}

/// Initializes and runs the application server.
///
/// Binds to the address specified in the configuration and serves requests
/// until the process is stopped.
///
/// # Errors
///
/// Returns an error if the configuration cannot be turned into working
/// components, the server fails to bind to the specified address, or it
/// encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone())?;

    info!("Starting server on {}", config.bind_address);

    let app = routes::create_router(state);
    let listener = TcpListener::bind(&config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
