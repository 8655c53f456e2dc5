use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::error::{ConfigError, OAuthError};
use crate::config::SpotifyConfig;
use crate::models::{RefreshedToken, TokenPair};

/// The token endpoint of the authorization server.
///
/// Exchange and refresh only differ in the grant they send, so both live here
/// and tests can swap in a double for the whole endpoint.
#[async_trait::async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenPair, OAuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, OAuthError>;
}

/// `POST {accounts_url}/api/token` with HTTP Basic client authentication.
pub struct SpotifyTokenClient {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    client_secret: String,
}

impl SpotifyTokenClient {
    pub fn new(config: &SpotifyConfig) -> Result<Self, ConfigError> {
        if config.client_secret.trim().is_empty() {
            return Err(ConfigError::Missing("spotify.client_secret"));
        }
        let url = config.token_url();
        let token_url = Url::parse(&url).map_err(|source| ConfigError::InvalidUrl {
            name: "token",
            url,
            source,
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            token_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// Sends one form-encoded grant; `reject` turns a non-success status and body into the error.
    async fn post_grant<T: DeserializeOwned>(
        &self,
        form: &[(&str, &str)],
        reject: fn(u16, String) -> OAuthError,
    ) -> Result<T, OAuthError> {
        let resp = self
            .http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await
            .map_err(OAuthError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|e| {
                warn!(
                    event_name = "oauth.token_endpoint.body_unreadable",
                    event_domain = "oauth",
                    status = status.as_u16(),
                    "failed to read token endpoint error body: {}",
                    e
                );
                String::new()
            });
            return Err(reject(status.as_u16(), body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TokenEndpoint for SpotifyTokenClient {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenPair, OAuthError> {
        debug!(redirect_uri, "exchanging authorization code");
        self.post_grant(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
            |status, body| OAuthError::UpstreamToken { status, body },
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, OAuthError> {
        debug!("refreshing access token");
        self.post_grant(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
            |status, body| OAuthError::RefreshRejected { status, body },
        )
        .await
    }
}
