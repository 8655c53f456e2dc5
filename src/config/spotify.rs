use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Credentials and endpoints for the Spotify accounts service.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL of the accounts service; `/authorize` and `/api/token` hang off it.
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
    /// Timeout for a single token endpoint call.
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
    pub redirect_uris: RedirectUrisConfig,
}

/// The two callback URIs registered in the Spotify developer dashboard.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct RedirectUrisConfig {
    pub local: String,
    pub production: String,
}

impl SpotifyConfig {
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url.trim_end_matches('/'))
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }
}

fn default_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_timeout_in_ms() -> u64 {
    10_000
}
