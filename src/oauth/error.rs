use thiserror::Error;

/// Failures of the Spotify authorization flow.
///
/// A state token that cannot be decoded is not an error: the exchanger falls
/// back to host-based redirect resolution instead.
#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("authorization was denied by the user: {reason}")]
    ConsentDenied { reason: String },

    #[error("callback did not carry an authorization code")]
    MissingCode,

    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    #[error("token endpoint rejected the code exchange ({status}): {body}")]
    UpstreamToken { status: u16, body: String },

    #[error("token endpoint rejected the refresh token ({status}): {body}")]
    RefreshRejected { status: u16, body: String },

    #[error("failed to reach token endpoint: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("token endpoint returned an unreadable response: {0}")]
    InvalidResponse(String),
}

impl OAuthError {
    /// True when the user has to go through the consent screen again.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            OAuthError::ConsentDenied { .. }
                | OAuthError::MissingCode
                | OAuthError::UpstreamToken { .. }
                | OAuthError::RefreshRejected { .. }
        )
    }
}

/// Problems found while building the OAuth components from configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name} URL '{url}': {source}")]
    InvalidUrl {
        name: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} must be configured")]
    Missing(&'static str),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
