//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob store backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob store abstraction
///
/// The upload orchestrator only ever writes: one `upload` per staged file. Reads and
/// deletes belong to whatever serves the download link.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `path` inside `bucket` and return a locator URL for it.
    ///
    /// An existing object at the same path is not silently replaced by the local backend;
    /// the call fails with `UploadFailed` instead.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
