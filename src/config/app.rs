use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the browser is sent once the callback has been handled.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct AppConfig {
    #[serde(default = "default_success_path")]
    pub success_path: String,
    #[serde(default = "default_error_path")]
    pub error_path: String,
    /// Present when the app is also served as a mini-app inside another client.
    #[serde(default)]
    pub embedded: Option<EmbeddedHostConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            success_path: default_success_path(),
            error_path: default_error_path(),
            embedded: None,
        }
    }
}

/// The embedding client: which referer hosts identify it and where to send users back.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct EmbeddedHostConfig {
    pub hosts: Vec<String>,
    pub app_url: String,
}

/// Cookie attributes for the persisted token pair.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct CookieConfig {
    #[serde(default = "default_access_token_name")]
    pub access_token_name: String,
    #[serde(default = "default_refresh_token_name")]
    pub refresh_token_name: String,
    #[serde(default = "default_secure")]
    pub secure: bool,
    #[serde(default = "default_refresh_max_age_secs")]
    pub refresh_max_age_secs: u64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_token_name: default_access_token_name(),
            refresh_token_name: default_refresh_token_name(),
            secure: default_secure(),
            refresh_max_age_secs: default_refresh_max_age_secs(),
        }
    }
}

fn default_success_path() -> String {
    "/profile".to_string()
}

fn default_error_path() -> String {
    "/connect-spotify".to_string()
}

fn default_access_token_name() -> String {
    "access_token".to_string()
}

fn default_refresh_token_name() -> String {
    "refresh_token".to_string()
}

fn default_secure() -> bool {
    true
}

// 30 days
fn default_refresh_max_age_secs() -> u64 {
    30 * 24 * 60 * 60
}
