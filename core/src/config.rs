//! Client configuration.
//!
//! # Design
//! Settings are layered with figment: struct defaults first, then
//! `ROCKETREACH_`-prefixed environment variables. `validate` runs after
//! extraction so a client is never built from an empty key or a base URL
//! without an http(s) scheme.

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Production endpoint of the RocketReach v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api.rocketreach.co/api/v2";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client settings.
///
/// Loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. Environment variables with the `ROCKETREACH_` prefix
#[derive(Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// API key sent as the `Api-Key` header (required).
    #[serde(default)]
    pub api_key: String,

    /// Root URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout applied by the transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Defaults overlaid with `ROCKETREACH_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed("ROCKETREACH_"))
    }

    /// Load and validate configuration from the environment.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidConfig` if extraction or validation fails.
    pub fn load() -> Result<Self, ApiError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate configuration from an arbitrary figment.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidConfig` if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ApiError> {
        let config: Self = figment
            .extract()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ApiError::InvalidConfig` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.api_key.trim().is_empty() {
            return Err(ApiError::InvalidConfig(
                "api_key is required. Set ROCKETREACH_API_KEY or pass it to the client.".into(),
            ));
        }

        // The key travels as a header value.
        if self.api_key.chars().any(|c| !c.is_ascii() || c.is_ascii_control()) {
            return Err(ApiError::InvalidConfig(
                "api_key contains characters not allowed in an HTTP header".into(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidConfig(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig("timeout_secs cannot be 0".into()));
        }

        Ok(())
    }
}
