//! Configuration loading and resolution
//!
//! Settings resolve with ENV → TOML → compiled default priority. A value
//! present in several sources logs a warning naming the winner.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// TOML configuration file contents (`~/.config/lpf/lpf-gen.toml`)
///
/// Every field is optional; absent fields fall through to the
/// environment or the compiled default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Socket address to listen on (e.g. "127.0.0.1:8000")
    pub bind: Option<String>,
    /// LLM provider API key
    pub google_api_key: Option<String>,
    /// News provider API key
    pub newsapi_key: Option<String>,
    /// Object storage / post database base URL
    pub supabase_url: Option<String>,
    /// Object storage / post database API key
    pub supabase_key: Option<String>,
    /// Storage bucket holding generated media
    pub storage_bucket: Option<String>,
    /// Allowed CORS origins for the frontend
    pub cors_origins: Option<Vec<String>>,
}

/// Get the default configuration file path for the platform
///
/// Linux: `~/.config/lpf/lpf-gen.toml`, with `/etc/lpf/lpf-gen.toml` as
/// the system-wide fallback. macOS/Windows use the OS config directory.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("lpf").join("lpf-gen.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc/lpf/lpf-gen.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        user_config
    } else {
        user_config
    }
}

/// Load the TOML configuration file
///
/// A missing file is not an error (returns defaults); a malformed file is.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolve a single setting with ENV → TOML priority
///
/// Warns when the setting is present in several sources (potential
/// misconfiguration) and logs where the winning value came from.
pub fn resolve_setting(label: &str, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_value(v));
    let toml_value = toml_value.filter(|v| is_valid_value(v)).map(str::to_string);

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML. Using environment (highest priority).",
            label
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable {}", label, env_var);
        return Some(value);
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", label);
        return Some(value);
    }

    None
}

/// Validate a setting value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_invalid() {
        assert!(!is_valid_value(""));
        assert!(!is_valid_value("   "));
        assert!(is_valid_value("key-123"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_toml_config(Path::new("/nonexistent/lpf-gen.toml")).unwrap();
        assert!(config.bind.is_none());
        assert!(config.google_api_key.is_none());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lpf-gen.toml");
        std::fs::write(&path, "bind = [not toml").unwrap();
        assert!(load_toml_config(&path).is_err());
    }
}
