//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `EASY_BUDGET` prefix and
//! `__` separates nested sections.
//!
//! # Example
//!
//! ```no_run
//! use easy_budget::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod client;
mod database;
mod entitlement;
mod error;
mod server;

pub use auth::AuthConfig;
pub use client::ClientConfig;
pub use database::DatabaseConfig;
pub use entitlement::EntitlementConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub entitlement: EntitlementConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `EASY_BUDGET__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `EASY_BUDGET__DATABASE__URL=...` -> `database.url = ...`
    /// - `EASY_BUDGET__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EASY_BUDGET")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate(&self.server.environment)?;
        self.auth.validate()?;
        self.entitlement.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "EASY_BUDGET__DATABASE__URL",
        "EASY_BUDGET__AUTH__JWT_SECRET",
        "EASY_BUDGET__AUTH__ISSUER",
        "EASY_BUDGET__SERVER__PORT",
        "EASY_BUDGET__SERVER__ENVIRONMENT",
        "EASY_BUDGET__ENTITLEMENT__TRIAL_WINDOW_DAYS",
    ];

    fn set_minimal_env() {
        env::set_var("EASY_BUDGET__DATABASE__URL", "postgresql://test@localhost/budget");
        env::set_var(
            "EASY_BUDGET__AUTH__JWT_SECRET",
            "test-secret-that-is-at-least-32-bytes-long",
        );
        env::set_var("EASY_BUDGET__AUTH__ISSUER", "https://auth.example.com/auth/v1");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/budget");
        assert_eq!(config.auth.issuer, "https://auth.example.com/auth/v1");
        assert_eq!(config.entitlement.trial_window_days, 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_are_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("EASY_BUDGET__SERVER__PORT", "9090");
        env::set_var("EASY_BUDGET__ENTITLEMENT__TRIAL_WINDOW_DAYS", "7");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.entitlement.trial_window_days, 7);
    }

    #[test]
    fn production_without_database_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(
            "EASY_BUDGET__AUTH__JWT_SECRET",
            "test-secret-that-is-at-least-32-bytes-long",
        );
        env::set_var("EASY_BUDGET__AUTH__ISSUER", "https://auth.example.com/auth/v1");
        env::set_var("EASY_BUDGET__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("DATABASE__URL"))
        );
    }
}
