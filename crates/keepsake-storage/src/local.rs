use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Each bucket is a directory under `base_path`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blob storage (e.g., "/var/lib/keepsake/storage")
    /// * `base_url` - Base URL the files are served from (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert bucket and key to a filesystem path, rejecting anything that could
    /// resolve outside the bucket directory.
    fn key_to_path(&self, bucket: &str, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(bucket)?;
        if bucket.contains('/') {
            return Err(StorageError::InvalidKey(format!(
                "Bucket must be a single path segment: {}",
                bucket
            )));
        }
        validate_key(storage_key)?;

        let relative = Path::new(storage_key);
        if !relative
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(self.base_path.join(bucket).join(relative))
    }

    fn generate_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url.trim_end_matches('/'), bucket, key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let file_path = self.key_to_path(bucket, path)?;
        let size = data.len();

        self.ensure_parent_dir(&file_path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    file_path.display(),
                    e
                ))
            })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let url = self.generate_url(bucket, path);

        tracing::info!(
            path = %file_path.display(),
            bucket = %bucket,
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
