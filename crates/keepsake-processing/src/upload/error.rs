use keepsake_core::AppError;
use keepsake_storage::StorageError;

/// Failure of a commit.
///
/// The first failure aborts the batch. Files uploaded before it stay in the blob store
/// and the metadata store, and the batch stays staged, so a retry uploads them again.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload failed for {file_name} at {path}")]
    BlobUpload {
        file_name: String,
        path: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to record metadata for {file_name} at {path}")]
    MetadataInsert {
        file_name: String,
        path: String,
        #[source]
        source: AppError,
    },

    #[error("Failed to create download link")]
    LinkCreation {
        #[source]
        source: AppError,
    },
}

impl UploadError {
    /// Storage path of the file being processed when the commit failed, if any.
    pub fn failed_path(&self) -> Option<&str> {
        match self {
            UploadError::BlobUpload { path, .. } | UploadError::MetadataInsert { path, .. } => {
                Some(path)
            }
            UploadError::LinkCreation { .. } => None,
        }
    }
}
