//! Client configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for deployment.
//! Config precedence: env vars > .env file > shortlink.toml > defaults

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Prefix for the backend admin API; every typed endpoint lives below it.
pub const ADMIN_API_PREFIX: &str = "/api/short-link/admin/v1";

/// Envelope codes accepted as success unless configured otherwise.
pub const DEFAULT_SUCCESS_CODES: [&str; 4] = ["0", "0000", "SUCCESS", "200"];

/// Load configuration, optionally from an explicit file instead of `shortlink.toml`.
///
/// Callers own the returned value and pass it to whatever needs it; there is
/// no process-wide config instance.
pub fn load(path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name("shortlink").required(false),
    };

    let cfg = with_defaults(config::Config::builder())?
        .add_source(file)
        // Environment variables (SHORTLINK__API__BASE_URL, SHORTLINK__LOCATION__API_KEY, etc.)
        .add_source(
            config::Environment::with_prefix("SHORTLINK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("api.success_codes"),
        )
        .build()?;

    cfg.try_deserialize()
}

/// Parse configuration from a TOML string layered over the defaults.
pub fn from_toml(source: &str) -> Result<AppConfig, config::ConfigError> {
    with_defaults(config::Config::builder())?
        .add_source(config::File::from_str(source, config::FileFormat::Toml))
        .build()?
        .try_deserialize()
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("api.base_url", "http://localhost:8888")?
        .set_default("api.timeout_secs", 15)?
        .set_default("api.success_codes", DEFAULT_SUCCESS_CODES.to_vec())?
        .set_default("session.storage_path", "./data/session.json")?
        .set_default("location.endpoint", "https://restapi.amap.com/v3/ip")?
        .set_default("location.api_key", "")?
        .set_default("location.timeout_secs", 10)
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Backend origin, e.g. `http://localhost:8888`. The admin prefix is appended per call.
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Envelope `code`s that mark a successful response. Most endpoints answer
    /// `"0"`; `has-username` and `logout` answer `"200"`.
    pub success_codes: Vec<String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888".into(),
            timeout_secs: 15,
            success_codes: DEFAULT_SUCCESS_CODES.iter().map(|c| (*c).to_owned()).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// JSON file holding the persisted session between runs.
    pub storage_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationConfig {
    /// Third-party IP geolocation endpoint (AMap-compatible)
    pub endpoint: String,
    /// Provider API key
    pub api_key: String,
    pub timeout_secs: u64,
}

impl LocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_section() {
        let cfg = from_toml("").unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:8888");
        assert_eq!(cfg.api.timeout(), Duration::from_secs(15));
        assert_eq!(cfg.api.success_codes, DEFAULT_SUCCESS_CODES);
        assert_eq!(cfg.session.storage_path, "./data/session.json");
        assert_eq!(cfg.location.timeout(), Duration::from_secs(10));
        assert!(cfg.location.api_key.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let cfg = from_toml(
            r#"
            [api]
            base_url = "https://admin.example.com"
            success_codes = ["0000"]

            [location]
            api_key = "k-123"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "https://admin.example.com");
        assert_eq!(cfg.api.success_codes, ["0000"]);
        assert_eq!(cfg.api.timeout_secs, 15);
        assert_eq!(cfg.location.api_key, "k-123");
    }
}
