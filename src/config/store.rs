//! Document store selection

use serde::Deserialize;

/// Which document store adapter to wire at startup
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store; data is lost on exit
    #[default]
    Memory,
    /// PostgreSQL JSONB table, configured by `database`
    Postgres,
}

/// Store configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

impl StoreConfig {
    /// Whether the database section must be valid
    pub fn requires_database(&self) -> bool {
        self.backend == StoreBackend::Postgres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_defaults_to_memory() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert!(!config.requires_database());
    }

    #[test]
    fn test_store_backend_deserialization() {
        let config: StoreConfig = serde_json::from_str(r#"{"backend": "postgres"}"#).unwrap();
        assert_eq!(config.backend, StoreBackend::Postgres);
        assert!(config.requires_database());
    }
}
