//! S3-compatible object store (stub — requires the `s3` feature for the
//! AWS SDK implementation).

use async_trait::async_trait;
use bytes::Bytes;

use certvault_core::error::AppError;
use certvault_core::result::AppResult;
use certvault_core::traits::storage::ObjectStore;

/// S3-compatible object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store.
    pub async fn new(
        endpoint: &str,
        region: &str,
        bucket: &str,
        _access_key: &str,
        _secret_key: &str,
    ) -> AppResult<Self> {
        tracing::info!(endpoint, region, bucket, "Initializing S3 object store");
        Ok(Self {
            bucket: bucket.to_string(),
            region: region.to_string(),
        })
    }

    /// The configured bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The configured region.
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::service_unavailable(
            "S3 health check requires the s3 feature",
        ))
    }

    async fn write(&self, _path: &str, _data: Bytes) -> AppResult<()> {
        Err(AppError::service_unavailable(
            "S3 write requires the s3 feature",
        ))
    }

    async fn read_bytes(&self, _path: &str) -> AppResult<Bytes> {
        Err(AppError::service_unavailable(
            "S3 read requires the s3 feature",
        ))
    }

    async fn delete(&self, _path: &str) -> AppResult<()> {
        Err(AppError::service_unavailable(
            "S3 delete requires the s3 feature",
        ))
    }

    async fn exists(&self, _path: &str) -> AppResult<bool> {
        Err(AppError::service_unavailable(
            "S3 exists requires the s3 feature",
        ))
    }
}
