use std::sync::Arc;

use tracing::{info, warn};

use super::client::TokenEndpoint;
use super::error::OAuthError;
use crate::models::RefreshedToken;

/// Obtains a fresh access token from a previously issued refresh token.
pub struct TokenRefresher {
    endpoint: Arc<dyn TokenEndpoint>,
}

impl TokenRefresher {
    pub fn new(endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self { endpoint }
    }

    /// A rejected refresh token means the connection is lost and the full
    /// authorization flow has to run again; nothing is retried here.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, OAuthError> {
        if refresh_token.trim().is_empty() {
            return Err(OAuthError::EmptyInput {
                field: "refresh token",
            });
        }

        match self.endpoint.refresh(refresh_token).await {
            Ok(token) => {
                info!(
                    event_name = "oauth.refresh.succeeded",
                    event_domain = "oauth",
                    expires_in = token.expires_in,
                    rotated = token.refresh_token.is_some(),
                    "access token refreshed"
                );
                Ok(token)
            }
            Err(e) => {
                warn!(
                    event_name = "oauth.refresh.failed",
                    event_domain = "oauth",
                    "access token refresh failed: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
