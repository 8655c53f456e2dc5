use std::sync::Arc;

use tracing::{info, warn};

use super::client::TokenEndpoint;
use super::error::OAuthError;
use super::redirect::RedirectResolver;
use super::state_token::StateToken;
use crate::models::TokenPair;

/// Turns an authorization code into a token pair.
///
/// The redirect URI sent to the token endpoint must be the one the consent URL
/// was built with, so it is taken from the state token whenever possible and
/// only re-derived from the host as a fallback.
pub struct TokenExchanger {
    resolver: RedirectResolver,
    endpoint: Arc<dyn TokenEndpoint>,
}

impl TokenExchanger {
    pub fn new(resolver: RedirectResolver, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self { resolver, endpoint }
    }

    /// The redirect URI to present at exchange time.
    pub fn redirect_uri_for(&self, state: Option<&str>, host: Option<&str>) -> String {
        if let Some(raw) = state {
            match StateToken::decode_redirect_uri(raw) {
                Some(uri) if self.resolver.is_registered(&uri) => return uri,
                Some(uri) => warn!(
                    event_name = "oauth.exchange.state.unregistered_redirect",
                    event_domain = "oauth",
                    redirect_uri = uri.as_str(),
                    "state carried a redirect URI that is not registered; ignoring it"
                ),
                None => warn!(
                    event_name = "oauth.exchange.state.undecodable",
                    event_domain = "oauth",
                    "could not recover redirect URI from state; falling back to host resolution"
                ),
            }
        }
        self.resolver.resolve(host).to_string()
    }

    pub async fn exchange(
        &self,
        code: &str,
        state: Option<&str>,
        host: Option<&str>,
    ) -> Result<TokenPair, OAuthError> {
        if code.trim().is_empty() {
            return Err(OAuthError::EmptyInput {
                field: "authorization code",
            });
        }

        let redirect_uri = self.redirect_uri_for(state, host);
        match self.endpoint.exchange_code(code, &redirect_uri).await {
            Ok(pair) => {
                info!(
                    event_name = "oauth.exchange.succeeded",
                    event_domain = "oauth",
                    redirect_uri = redirect_uri.as_str(),
                    expires_in = pair.expires_in,
                    "authorization code exchanged"
                );
                Ok(pair)
            }
            Err(e) => {
                warn!(
                    event_name = "oauth.exchange.failed",
                    event_domain = "oauth",
                    redirect_uri = redirect_uri.as_str(),
                    "authorization code exchange failed: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
