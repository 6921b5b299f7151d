//! Commit of a staged batch.
//!
//! Files are processed strictly one after another: the next upload does not start until
//! the previous file's metadata insert has returned. The download link is inserted only
//! after every file of the batch succeeded.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use keepsake_core::constants::{DEFAULT_LINK_RETENTION_DAYS, DEFAULT_UPLOAD_BUCKET};
use keepsake_core::{Config, DownloadLinkRecord, StagedFile, UploadMetadataRecord};
use keepsake_db::MetadataStore;
use keepsake_storage::{keys, Storage};
use uuid::Uuid;

use super::error::UploadError;
use super::session::UploadSession;
use super::tokens::TokenGenerator;

/// Where uploads go and how long their link lives.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub bucket: String,
    pub link_retention: Duration,
}

impl UploadSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bucket: config.upload_bucket().to_string(),
            link_retention: config.link_retention(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_UPLOAD_BUCKET.to_string(),
            link_retention: Duration::days(DEFAULT_LINK_RETENTION_DAYS),
        }
    }
}

/// Drains an [`UploadSession`] into the blob store and metadata store.
///
/// `commit` is the only entry point that touches the blob store or metadata store.
pub struct UploadOrchestrator {
    session: Arc<UploadSession>,
    storage: Arc<dyn Storage>,
    metadata: Arc<dyn MetadataStore>,
    tokens: Arc<dyn TokenGenerator>,
    settings: UploadSettings,
}

impl UploadOrchestrator {
    pub fn new(
        session: Arc<UploadSession>,
        storage: Arc<dyn Storage>,
        metadata: Arc<dyn MetadataStore>,
        tokens: Arc<dyn TokenGenerator>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            session,
            storage,
            metadata,
            tokens,
            settings,
        }
    }

    /// Upload every staged file, record its metadata, then issue one download link
    /// expiring `settings.link_retention` after `context_date`.
    ///
    /// Returns `Ok(None)` without side effects when a commit is already running or
    /// nothing is staged. On success the committed files leave staging and
    /// `upload_complete` becomes true. On failure staging is left as it was, apart from
    /// progress on files that made it through.
    pub async fn commit(
        &self,
        context_date: DateTime<Utc>,
    ) -> Result<Option<DownloadLinkRecord>, UploadError> {
        if self.session.staged_count().await == 0 {
            tracing::debug!("Commit skipped: nothing staged");
            return Ok(None);
        }

        let Some(_uploading) = self.session.begin_upload() else {
            tracing::debug!("Commit skipped: an upload batch is already running");
            return Ok(None);
        };

        let batch = self.session.staged_files().await;
        if batch.is_empty() {
            return Ok(None);
        }

        self.session.set_upload_complete(false);

        let start = std::time::Instant::now();
        tracing::info!(
            file_count = batch.len(),
            bucket = %self.settings.bucket,
            context_date = %context_date,
            "Starting upload batch"
        );

        let link = match self.run_batch(&batch, context_date).await {
            Ok(link) => link,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    cause = ?std::error::Error::source(&e).map(|s| s.to_string()),
                    failed_path = ?e.failed_path(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload batch failed"
                );
                return Err(e);
            }
        };

        let committed: Vec<Uuid> = batch.iter().map(|f| f.id).collect();
        self.session.staging().await.remove_committed(&committed);
        self.session.set_upload_complete(true);

        tracing::info!(
            file_count = batch.len(),
            expires_at = %link.expires_at,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload batch committed"
        );

        Ok(Some(link))
    }

    async fn run_batch(
        &self,
        batch: &[StagedFile],
        context_date: DateTime<Utc>,
    ) -> Result<DownloadLinkRecord, UploadError> {
        let total = batch.len();

        for (index, file) in batch.iter().enumerate() {
            let path = self.upload_file(file, context_date).await?;

            self.session.staging().await.mark_uploaded(file.id);

            tracing::info!(
                file_index = index + 1,
                file_count = total,
                file_name = %file.name,
                path = %path,
                "File uploaded"
            );
        }

        self.create_link(context_date).await
    }

    async fn upload_file(
        &self,
        file: &StagedFile,
        context_date: DateTime<Utc>,
    ) -> Result<String, UploadError> {
        let suffix = self.tokens.path_suffix();
        let path = keys::storage_path(context_date, &suffix, &file.name);

        self.storage
            .upload(
                &self.settings.bucket,
                &path,
                &file.mime_type,
                file.payload.clone(),
            )
            .await
            .map_err(|source| UploadError::BlobUpload {
                file_name: file.name.clone(),
                path: path.clone(),
                source,
            })?;

        let record = UploadMetadataRecord::for_staged(file, path.clone());
        self.metadata
            .insert_upload(&record)
            .await
            .map_err(|source| UploadError::MetadataInsert {
                file_name: file.name.clone(),
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    async fn create_link(
        &self,
        context_date: DateTime<Utc>,
    ) -> Result<DownloadLinkRecord, UploadError> {
        let token = self.tokens.link_token();
        let link = DownloadLinkRecord::issue(token, context_date, self.settings.link_retention)
            .map_err(|source| UploadError::LinkCreation { source })?;

        self.metadata
            .insert_download_link(&link)
            .await
            .map_err(|source| UploadError::LinkCreation { source })?;

        Ok(link)
    }
}
