//! Object store trait for pluggable storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for object storage backends holding the physical certificate
/// documents.
///
/// The trait is defined here in `certvault-core` and implemented in
/// `certvault-storage` (local filesystem by default, S3 behind a feature).
/// Folder rows never have a corresponding object; only file uploads go
/// through this interface.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write an object at the given path, creating parents as needed.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Read an object into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Delete the object at the given path.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether an object exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
