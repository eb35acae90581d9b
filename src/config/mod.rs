//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHURCH_REGISTRY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use church_registry::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod logging;
mod store;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use store::{StoreBackend, StoreConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// in-memory configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Which document store adapter to use
    #[serde(default)]
    pub store: StoreConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHURCH_REGISTRY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHURCH_REGISTRY__STORE__BACKEND=postgres` -> `store.backend = postgres`
    /// - `CHURCH_REGISTRY__DATABASE__URL=...` -> `database.url = ...`
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
                    .prefix("CHURCH_REGISTRY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is only checked when the Postgres store is selected.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store.requires_database() {
            self.database.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("CHURCH_REGISTRY__STORE__BACKEND");
        env::remove_var("CHURCH_REGISTRY__DATABASE__URL");
        env::remove_var("CHURCH_REGISTRY__DATABASE__MAX_CONNECTIONS");
        env::remove_var("CHURCH_REGISTRY__LOGGING__FORMAT");
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_postgres_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CHURCH_REGISTRY__STORE__BACKEND", "postgres");
        env::set_var(
            "CHURCH_REGISTRY__DATABASE__URL",
            "postgresql://registry@localhost/registry",
        );
        env::set_var("CHURCH_REGISTRY__DATABASE__MAX_CONNECTIONS", "8");
        env::set_var("CHURCH_REGISTRY__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.database.url, "postgresql://registry@localhost/registry");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let config = AppConfig {
            store: StoreConfig {
                backend: StoreBackend::Postgres,
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("DATABASE__URL"))
        );
    }

    #[test]
    fn test_memory_backend_ignores_database_section() {
        let config = AppConfig::default();
        assert!(config.database.url.is_empty());
        assert!(config.validate().is_ok());
    }
}
