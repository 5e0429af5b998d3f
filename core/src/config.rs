//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_API_URL` - Base URL of the storefront API (default: `http://127.0.0.1:8080`)
//! - `STOREFRONT_EMPLOYEE_ID` - Employee recorded on placed orders (default: 1)

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_EMPLOYEE_ID: i64 = 1;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub employee_id: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            employee_id: DEFAULT_EMPLOYEE_ID,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("STOREFRONT_API_URL") {
            Some(raw) => parse_api_url(&raw)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let employee_id = match lookup("STOREFRONT_EMPLOYEE_ID") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "STOREFRONT_EMPLOYEE_ID".to_string(),
                        format!("expected a positive integer, got {raw:?}"),
                    )
                })?,
            None => DEFAULT_EMPLOYEE_ID,
        };

        Ok(Self {
            api_url,
            employee_id,
        })
    }
}

/// Validate an API base URL and strip its trailing slash.
pub fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("STOREFRONT_API_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.query().is_some() {
        return Err(invalid("base URL must not carry a query string".to_string()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
