//! Church Registry service entry point.
//!
//! Loads configuration, installs logging, wires the configured document
//! store into a `ConsistencyValidator`, and verifies the store is reachable.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use church_registry::adapters::{InMemoryDocumentStore, PostgresDocumentStore};
use church_registry::application::ConsistencyValidator;
use church_registry::config::{AppConfig, StoreBackend};
use church_registry::ports::{DocumentStore, StoreError};
use church_registry::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = telemetry::init(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), StoreError> {
    let store: Arc<dyn DocumentStore> = match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Arc::new(InMemoryDocumentStore::new())
        }
        StoreBackend::Postgres => {
            let store = PostgresDocumentStore::connect(&config.database).await?;
            if config.database.run_migrations {
                store.run_migrations().await?;
                info!("Migrations applied");
            }
            info!(max_connections = config.database.max_connections, "Using PostgreSQL document store");
            Arc::new(store)
        }
    };

    let validator = ConsistencyValidator::new(store);

    // Reachability: a snapshot round trip touches the store end to end.
    let tx = validator.begin_snapshot().await?;
    validator.end_snapshot(&tx).await?;

    info!(backend = ?config.store.backend, "Consistency validator ready");
    Ok(())
}
