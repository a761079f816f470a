//! Device-side client configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Settings for the entitlement client embedded in the app.
///
/// Loaded with the `EASY_BUDGET_CLIENT` prefix, e.g.
/// `EASY_BUDGET_CLIENT__API_BASE_URL=https://api.easybudget.io`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,

    #[serde(default)]
    pub environment: Environment,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_secs: default_request_timeout(),
            cache_max_age_secs: default_cache_max_age(),
            environment: Environment::default(),
        }
    }

    /// Load from environment variables (and `.env` if present).
    pub fn load() -> Result<Self, super::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EASY_BUDGET_CLIENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("API_BASE_URL"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidApiBaseUrl(url.to_string()));
        }
        if self.environment == Environment::Production && !url.starts_with("https://") {
            return Err(ValidationError::ApiBaseUrlMustBeHttps);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.cache_max_age_secs == 0 {
            return Err(ValidationError::InvalidCacheMaxAge);
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10
}

fn default_cache_max_age() -> u64 {
    24 * 60 * 60
}
