//! Metadata store abstraction

use async_trait::async_trait;
use keepsake_core::{AppError, DownloadLinkRecord, UploadMetadataRecord};
use sqlx::PgPool;

use crate::db::{DownloadLinkRepository, UploadRepository};

/// Insert-only sink for upload metadata and download links.
///
/// Nothing in the upload path reads these records back; the route serving
/// `/download/{token}` is the consumer.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn insert_upload(&self, record: &UploadMetadataRecord) -> Result<(), AppError>;

    async fn insert_download_link(&self, link: &DownloadLinkRecord) -> Result<(), AppError>;
}

/// Postgres-backed metadata store
#[derive(Clone)]
pub struct PgMetadataStore {
    uploads: UploadRepository,
    links: DownloadLinkRepository,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            uploads: UploadRepository::new(pool.clone()),
            links: DownloadLinkRepository::new(pool),
        }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn insert_upload(&self, record: &UploadMetadataRecord) -> Result<(), AppError> {
        let id = self.uploads.insert(record).await?;
        tracing::debug!(
            upload_id = %id,
            file_path = %record.file_path,
            file_size = record.file_size,
            "Upload metadata inserted"
        );
        Ok(())
    }

    async fn insert_download_link(&self, link: &DownloadLinkRecord) -> Result<(), AppError> {
        let id = self.links.insert(link).await?;
        tracing::debug!(
            link_id = %id,
            expires_at = %link.expires_at,
            "Download link inserted"
        );
        Ok(())
    }
}
