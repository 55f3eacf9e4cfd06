//! CertVault Server — steel certificate document console backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use certvault_core::config::AppConfig;
use certvault_core::error::AppError;
use certvault_database::DatabasePool;
use certvault_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let env = std::env::var("CERTVAULT_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Starting CertVault v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    let object_store = certvault_storage::from_config(&config.storage).await?;
    tracing::info!(provider = object_store.provider_type(), "Object storage ready");

    let pool = db.pool().clone();
    let result = certvault_api::run_server(config, pool, Arc::clone(&object_store)).await;

    db.close().await;
    result
}
