//! Video Service configuration.
//!
//! Configuration is loaded from environment variables. The provider API key
//! is held in a `SecretString` and redacted in Debug output.

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default public bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default bind address for the health and metrics listener.
pub const DEFAULT_OPS_BIND_ADDRESS: &str = "0.0.0.0:9090";

/// Default media region passed to the provider when creating meetings.
pub const DEFAULT_MEDIA_REGION: &str = "us-east-1";

/// Default provider request timeout in seconds.
pub const DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Upper bound for `PROVIDER_REQUEST_TIMEOUT_SECONDS`.
pub const MAX_PROVIDER_REQUEST_TIMEOUT_SECONDS: u64 = 120;

/// Default provider connect timeout in seconds.
pub const DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECONDS: u64 = 5;

/// Upper bound for `PROVIDER_CONNECT_TIMEOUT_SECONDS`.
pub const MAX_PROVIDER_CONNECT_TIMEOUT_SECONDS: u64 = 60;

/// Default drain period after a shutdown signal, in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 30;

/// Video Service configuration.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Clone)]
pub struct Config {
    /// Public router bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Health and metrics router bind address (default: "0.0.0.0:9090").
    pub ops_bind_address: String,

    /// Media region requested for new meetings (e.g., "us-east-1").
    pub media_region: String,

    /// Base URL of the video provider API.
    pub provider_url: String,

    /// Bearer credential for the video provider API.
    pub provider_api_key: SecretString,

    /// Total timeout for a single provider request, in seconds.
    pub provider_request_timeout_seconds: u64,

    /// Connect timeout for provider requests, in seconds.
    pub provider_connect_timeout_seconds: u64,

    /// Seconds to keep draining connections after a shutdown signal.
    pub drain_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("ops_bind_address", &self.ops_bind_address)
            .field("media_region", &self.media_region)
            .field("provider_url", &self.provider_url)
            .field("provider_api_key", &"[REDACTED]")
            .field(
                "provider_request_timeout_seconds",
                &self.provider_request_timeout_seconds,
            )
            .field(
                "provider_connect_timeout_seconds",
                &self.provider_connect_timeout_seconds,
            )
            .field("drain_seconds", &self.drain_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid provider URL: {0}")]
    InvalidProviderUrl(String),

    #[error("Invalid media region: {0}")]
    InvalidMediaRegion(String),

    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),

    #[error("Invalid drain configuration: {0}")]
    InvalidDrain(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let provider_url = vars
            .get("VIDEO_PROVIDER_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("VIDEO_PROVIDER_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        if !(provider_url.starts_with("http://") || provider_url.starts_with("https://")) {
            return Err(ConfigError::InvalidProviderUrl(format!(
                "VIDEO_PROVIDER_URL must start with http:// or https://, got '{}'",
                provider_url
            )));
        }

        let provider_api_key = vars
            .get("VIDEO_PROVIDER_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("VIDEO_PROVIDER_API_KEY".to_string()))?;
        let provider_api_key = SecretString::from(provider_api_key.clone());

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let ops_bind_address = vars
            .get("OPS_BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_OPS_BIND_ADDRESS.to_string());

        let media_region = vars
            .get("MEDIA_REGION")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MEDIA_REGION.to_string());

        if media_region.trim().is_empty() {
            return Err(ConfigError::InvalidMediaRegion(
                "MEDIA_REGION must not be empty".to_string(),
            ));
        }

        let provider_request_timeout_seconds = parse_timeout(
            vars,
            "PROVIDER_REQUEST_TIMEOUT_SECONDS",
            DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECONDS,
            MAX_PROVIDER_REQUEST_TIMEOUT_SECONDS,
        )?;

        let provider_connect_timeout_seconds = parse_timeout(
            vars,
            "PROVIDER_CONNECT_TIMEOUT_SECONDS",
            DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECONDS,
            MAX_PROVIDER_CONNECT_TIMEOUT_SECONDS,
        )?;

        // Zero is allowed: skips the drain period entirely
        let drain_seconds = match vars.get("VIDEO_DRAIN_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidDrain(format!(
                    "VIDEO_DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => DEFAULT_DRAIN_SECONDS,
        };

        Ok(Config {
            bind_address,
            ops_bind_address,
            media_region,
            provider_url,
            provider_api_key,
            provider_request_timeout_seconds,
            provider_connect_timeout_seconds,
            drain_seconds,
        })
    }
}

fn parse_timeout(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    let value: u64 = value_str.parse().map_err(|e| {
        ConfigError::InvalidTimeout(format!(
            "{} must be a valid positive integer, got '{}': {}",
            name, value_str, e
        ))
    })?;

    if value == 0 {
        return Err(ConfigError::InvalidTimeout(format!(
            "{} must be greater than 0",
            name
        )));
    }

    if value > max {
        return Err(ConfigError::InvalidTimeout(format!(
            "{} must not exceed {} seconds, got {}",
            name, max, value
        )));
    }

    Ok(value)
}
