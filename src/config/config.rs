use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::app::{AppConfig, CookieConfig};
use super::logging::LoggingConfig;
use super::spotify::SpotifyConfig;

/// Environment variables with this prefix override values from the YAML file,
/// using `__` to descend into sections (e.g. `VIBEAUTH_SPOTIFY__CLIENT_SECRET`).
pub const ENV_PREFIX: &str = "VIBEAUTH_";
/// Overrides the location of the configuration file.
pub const CONFIG_PATH_ENV: &str = "VIBEAUTH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub app: AppConfig,
}

/// Builds the figment for a config file plus the environment overrides.
pub fn config_figment(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
}

/// Extracts a versioned configuration from any figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Load config from the YAML file (default "config.yaml" in the current directory).
pub fn load_config() -> ConfigV1 {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    match extract_config(&config_figment(&path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration from '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
