use serde::Serialize;
use tracing::debug;
use url::Url;

use super::error::ConfigError;
use super::redirect::RedirectResolver;
use super::state_token::StateToken;
use crate::config::SpotifyConfig;

/// Scopes needed to show the profile and the top tracks.
pub const SCOPES: [&str; 3] = ["user-read-private", "user-read-email", "user-top-read"];

/// Everything a caller needs to send the browser to the consent screen.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationRequest {
    pub url: String,
    pub redirect_uri: String,
    #[serde(skip)]
    pub state: StateToken,
}

/// Builds consent-screen URLs carrying the chosen redirect URI inside the state token.
#[derive(Debug, Clone)]
pub struct AuthorizationUrlBuilder {
    authorize_endpoint: Url,
    client_id: String,
    resolver: RedirectResolver,
}

impl AuthorizationUrlBuilder {
    pub fn new(config: &SpotifyConfig, resolver: RedirectResolver) -> Result<Self, ConfigError> {
        if config.client_id.trim().is_empty() {
            return Err(ConfigError::Missing("spotify.client_id"));
        }
        let url = config.authorize_url();
        let authorize_endpoint = Url::parse(&url).map_err(|source| ConfigError::InvalidUrl {
            name: "authorize",
            url,
            source,
        })?;

        Ok(Self {
            authorize_endpoint,
            client_id: config.client_id.clone(),
            resolver,
        })
    }

    /// Builds a request for the given invocation host with a fresh random nonce.
    pub fn build(&self, host: Option<&str>) -> AuthorizationRequest {
        let redirect_uri = self.resolver.resolve(host);
        self.build_with_state(StateToken::with_random_nonce(redirect_uri))
    }

    /// Builds a request around an existing state token. The embedded redirect URI is used verbatim.
    pub fn build_with_state(&self, state: StateToken) -> AuthorizationRequest {
        let mut url = self.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("redirect_uri", state.redirect_uri())
            .append_pair("state", &state.encode());

        debug!(
            event_name = "oauth.authorize.url_built",
            event_domain = "oauth",
            redirect_uri = state.redirect_uri(),
            "built authorization URL"
        );

        AuthorizationRequest {
            url: url.into(),
            redirect_uri: state.redirect_uri().to_string(),
            state,
        }
    }
}
