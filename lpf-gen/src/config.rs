//! Service configuration for lpf-gen
//!
//! Resolution priority per setting: CLI argument → environment variable →
//! TOML config file → compiled default. Provider keys are optional; a
//! missing key disables the endpoints that need it rather than preventing
//! startup.

use lpf_common::config::{default_config_path, load_toml_config, resolve_setting, TomlConfig};
use lpf_common::Result;
use std::net::SocketAddr;
use std::path::Path;
use tracing::warn;

/// Default listen address
const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Default storage bucket for generated media
const DEFAULT_BUCKET: &str = "post-media";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address to listen on
    pub bind: SocketAddr,
    /// LLM provider API key (text + image generation)
    pub google_api_key: Option<String>,
    /// News provider API key
    pub newsapi_key: Option<String>,
    /// Object storage / post database base URL
    pub supabase_url: Option<String>,
    /// Object storage / post database API key
    pub supabase_key: Option<String>,
    /// Storage bucket holding generated media
    pub storage_bucket: String,
    /// Allowed CORS origins for the frontend
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Resolve configuration from CLI overrides, environment, and TOML
    pub fn resolve(cli_bind: Option<&str>, config_path: Option<&Path>) -> Result<Self> {
        let toml = match config_path {
            Some(path) => load_toml_config(path)?,
            None => match default_config_path() {
                Some(path) => load_toml_config(&path)?,
                None => TomlConfig::default(),
            },
        };

        let bind_str = cli_bind
            .map(str::to_string)
            .or_else(|| resolve_setting("Bind address", "LPF_BIND", toml.bind.as_deref()))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|e| lpf_common::Error::Config(format!("Invalid bind address '{}': {}", bind_str, e)))?;

        let google_api_key = resolve_setting(
            "Google API key",
            "LPF_GOOGLE_API_KEY",
            toml.google_api_key.as_deref(),
        );
        let newsapi_key =
            resolve_setting("NewsAPI key", "LPF_NEWSAPI_KEY", toml.newsapi_key.as_deref());
        let supabase_url = resolve_setting(
            "Supabase URL",
            "LPF_SUPABASE_URL",
            toml.supabase_url.as_deref(),
        )
        // A trailing slash in the base URL doubles up when joining paths.
        .map(|url| url.trim_end_matches('/').to_string());
        let supabase_key = resolve_setting(
            "Supabase key",
            "LPF_SUPABASE_KEY",
            toml.supabase_key.as_deref(),
        );

        if supabase_url.is_some() != supabase_key.is_some() {
            warn!("Supabase URL and key must both be set; storage disabled");
        }

        let storage_bucket = resolve_setting(
            "Storage bucket",
            "LPF_STORAGE_BUCKET",
            toml.storage_bucket.as_deref(),
        )
        .unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let cors_origins = toml
            .cors_origins
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        Ok(Config {
            bind,
            google_api_key,
            newsapi_key,
            supabase_url,
            supabase_key,
            storage_bucket,
            cors_origins,
        })
    }

    /// True when both storage settings are present
    pub fn storage_configured(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_bind_wins() {
        let config = Config::resolve(Some("0.0.0.0:9999"), Some(Path::new("/nonexistent"))).unwrap();
        assert_eq!(config.bind.to_string(), "0.0.0.0:9999");
    }

    #[test]
    fn invalid_bind_is_rejected() {
        assert!(Config::resolve(Some("not-an-address"), Some(Path::new("/nonexistent"))).is_err());
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let config = Config::resolve(None, Some(Path::new("/nonexistent"))).unwrap();
        assert_eq!(config.storage_bucket, DEFAULT_BUCKET);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert!(!config.storage_configured());
    }
}
