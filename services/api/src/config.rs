//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// Values that ship in `.env.example` files and must never be treated as real keys.
const PLACEHOLDER_KEYS: &[&str] = &["your_api_key_here", "sk-...", "changeme"];

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub store_path: PathBuf,
    pub log_level: Level,
    pub cors_origin: String,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_model: String,
    pub openai_model: String,
}

/// A credential is usable when it is present, non-blank and not a known placeholder.
/// Whether the key is actually accepted is only learned on the first call.
pub fn usable_credential(key: Option<&str>) -> Option<&str> {
    let key = key?.trim();
    if key.is_empty() || PLACEHOLDER_KEYS.iter().any(|p| key.eq_ignore_ascii_case(p)) {
        None
    } else {
        Some(key)
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server and Storage Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let store_path = lookup("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("users_database.json"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Load API Keys (as optional) ---
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY");
        let openai_api_key = lookup("OPENAI_API_KEY");

        // --- Load Model Settings ---
        let anthropic_model = lookup("ANTHROPIC_MODEL")
            .unwrap_or_else(|| "claude-sonnet-4-20250514".to_string());
        let openai_model = lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string());

        Ok(Self {
            bind_address,
            store_path,
            log_level,
            cors_origin,
            anthropic_api_key,
            openai_api_key,
            anthropic_model,
            openai_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.store_path, PathBuf::from("users_database.json"));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.anthropic_model, "claude-sonnet-4-20250514");
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn invalid_bind_address_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("BIND_ADDRESS", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "BIND_ADDRESS"));
    }

    #[test]
    fn placeholder_and_blank_keys_are_not_usable() {
        assert_eq!(usable_credential(None), None);
        assert_eq!(usable_credential(Some("   ")), None);
        assert_eq!(usable_credential(Some("your_api_key_here")), None);
        assert_eq!(usable_credential(Some(" sk-ant-real ")), Some("sk-ant-real"));
    }
}
