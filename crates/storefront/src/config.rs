//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ECOCYCLE_DATA_DIR` - Directory of the durable key/value storage (default: .ecocycle)
//! - `ECOCYCLE_CART_KEY` - Record name holding the cart (default: cart)
//! - `ECOCYCLE_POINTS_BALANCE` - Account points balance (default: 1250)
//! - `ECOCYCLE_SYNC_POLL_MS` - Cross-context storage poll period in ms (default: 250)
//! - `ECOCYCLE_CATALOG_PATH` - JSON product catalog (default: built-in catalog)
//! - `ECOCYCLE_ASSISTANT_URL` - Chat assistant endpoint (default: Gemini generateContent)
//! - `ECOCYCLE_ASSISTANT_API_KEY` - Chat assistant API key (assistant disabled when unset)

use std::path::PathBuf;
use std::time::Duration;

use ecocycle_core::Points;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".ecocycle";
const DEFAULT_CART_KEY: &str = "cart";
const DEFAULT_POINTS_BALANCE: &str = "1250";
const DEFAULT_SYNC_POLL_MS: &str = "250";
const DEFAULT_ASSISTANT_URL: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-pro:generateContent";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory backing the durable key/value storage
    pub data_dir: PathBuf,
    /// Name of the record holding the cart
    pub cart_key: String,
    /// Points balance reported by the account collaborator
    pub points_balance: Points,
    /// How often other contexts' writes are looked for
    pub sync_poll_interval: Duration,
    /// Optional JSON catalog file
    pub catalog_path: Option<PathBuf>,
    /// Chat assistant configuration
    pub assistant: AssistantConfig,
}

/// Chat assistant configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct AssistantConfig {
    /// `generateContent` endpoint (validated as a URL at load)
    pub url: String,
    /// API key; the assistant stays silent without one
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("ECOCYCLE_DATA_DIR", DEFAULT_DATA_DIR));
        let cart_key = parse_cart_key(&get_env_or_default("ECOCYCLE_CART_KEY", DEFAULT_CART_KEY))?;
        let points_balance = get_env_or_default("ECOCYCLE_POINTS_BALANCE", DEFAULT_POINTS_BALANCE)
            .parse::<u64>()
            .map(Points::new)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ECOCYCLE_POINTS_BALANCE".to_string(), e.to_string())
            })?;
        let sync_poll_interval =
            parse_poll_interval(&get_env_or_default("ECOCYCLE_SYNC_POLL_MS", DEFAULT_SYNC_POLL_MS))?;
        let catalog_path = get_optional_env("ECOCYCLE_CATALOG_PATH").map(PathBuf::from);

        Ok(Self {
            data_dir,
            cart_key,
            points_balance,
            sync_poll_interval,
            catalog_path,
            assistant: AssistantConfig::from_env()?,
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            points_balance: Points::new(1250),
            sync_poll_interval: Duration::from_millis(250),
            catalog_path: None,
            assistant: AssistantConfig::default(),
        }
    }
}

impl AssistantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_env_or_default("ECOCYCLE_ASSISTANT_URL", DEFAULT_ASSISTANT_URL);
        Url::parse(&url).map_err(|e| {
            ConfigError::InvalidEnvVar("ECOCYCLE_ASSISTANT_URL".to_string(), e.to_string())
        })?;
        let api_key = get_optional_env("ECOCYCLE_ASSISTANT_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        Ok(Self { url, api_key })
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ASSISTANT_URL.to_string(),
            api_key: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Record names become file names, so keep them to a safe alphabet.
fn parse_cart_key(value: &str) -> Result<String, ConfigError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(value.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "ECOCYCLE_CART_KEY".to_string(),
            format!("'{value}' must be non-empty and use only [A-Za-z0-9_-]"),
        ))
    }
}

fn parse_poll_interval(value: &str) -> Result<Duration, ConfigError> {
    let millis = value.parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("ECOCYCLE_SYNC_POLL_MS".to_string(), e.to_string())
    })?;
    if millis == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "ECOCYCLE_SYNC_POLL_MS".to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cart_key_valid() {
        assert_eq!(parse_cart_key("cart").unwrap(), "cart");
        assert_eq!(parse_cart_key("cart_v2-test").unwrap(), "cart_v2-test");
    }

    #[test]
    fn test_parse_cart_key_rejects_paths() {
        assert!(parse_cart_key("../cart").is_err());
        assert!(parse_cart_key("").is_err());
    }

    #[test]
    fn test_parse_poll_interval() {
        assert_eq!(parse_poll_interval("40").unwrap(), Duration::from_millis(40));
        assert!(matches!(
            parse_poll_interval("0"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_poll_interval("soon").is_err());
    }

    #[test]
    fn test_assistant_config_debug_redacts_key() {
        let config = AssistantConfig {
            api_key: Some(SecretString::from("aB3xY9mK2nL5pQ7rT0uW4zC6")),
            ..AssistantConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("aB3xY9mK2nL5pQ7rT0uW4zC6"));
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.points_balance, Points::new(1250));
        assert!(config.assistant.api_key.is_none());
    }
}
