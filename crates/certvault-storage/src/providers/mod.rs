//! Storage provider implementations and configuration-driven selection.

pub mod local;
pub mod s3;

use std::sync::Arc;

use certvault_core::config::storage::StorageConfig;
use certvault_core::error::AppError;
use certvault_core::result::AppResult;
use certvault_core::traits::storage::ObjectStore;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// Build the configured object store provider.
pub async fn from_config(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.provider.as_str() {
        "local" => {
            let provider = LocalObjectStore::new(&config.local.root_path).await?;
            Ok(Arc::new(provider))
        }
        "s3" => {
            let provider = S3ObjectStore::new(
                &config.s3.endpoint,
                &config.s3.region,
                &config.s3.bucket,
                &config.s3.access_key,
                &config.s3.secret_key,
            )
            .await?;
            Ok(Arc::new(provider))
        }
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: '{other}'"
        ))),
    }
}
