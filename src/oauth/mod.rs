pub mod authorize;
pub mod callback;
pub mod client;
pub mod cookies;
pub mod error;
pub mod exchange;
pub mod flow;
pub mod redirect;
pub mod refresh;
pub mod state_token;

use std::sync::Arc;

use tracing::info;

pub use authorize::{AuthorizationRequest, AuthorizationUrlBuilder};
pub use callback::{CallbackFailure, CallbackParams, InvocationOrigin, PostLoginRedirects};
pub use client::{SpotifyTokenClient, TokenEndpoint};
pub use error::{ConfigError, OAuthError};
pub use exchange::TokenExchanger;
pub use flow::{ConnectionState, FlowEvent};
pub use redirect::{RedirectResolver, RedirectTarget};
pub use refresh::TokenRefresher;
pub use state_token::StateToken;

use crate::config::ConfigV1;

/// The Spotify flow components, built once from configuration and shared by all handlers.
pub struct SpotifyAuth {
    pub authorizer: AuthorizationUrlBuilder,
    pub exchanger: TokenExchanger,
    pub refresher: TokenRefresher,
    pub redirects: PostLoginRedirects,
}

impl SpotifyAuth {
    /// Builds the components against the real Spotify token endpoint.
    pub fn new(config: &ConfigV1) -> Result<Self, ConfigError> {
        let endpoint = Arc::new(SpotifyTokenClient::new(&config.spotify)?);
        Self::with_endpoint(config, endpoint)
    }

    /// Builds the components around any token endpoint implementation.
    pub fn with_endpoint(
        config: &ConfigV1,
        endpoint: Arc<dyn TokenEndpoint>,
    ) -> Result<Self, ConfigError> {
        info!(
            "Creating Spotify auth for client '{}' (local redirect '{}', production redirect '{}')",
            config.spotify.client_id,
            config.spotify.redirect_uris.local,
            config.spotify.redirect_uris.production
        );

        let resolver = RedirectResolver::new(&config.spotify.redirect_uris);
        Ok(Self {
            authorizer: AuthorizationUrlBuilder::new(&config.spotify, resolver.clone())?,
            exchanger: TokenExchanger::new(resolver, endpoint.clone()),
            refresher: TokenRefresher::new(endpoint),
            redirects: PostLoginRedirects::new(&config.app),
        })
    }
}
