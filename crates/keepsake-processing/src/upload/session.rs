use std::sync::atomic::{AtomicBool, Ordering};

use keepsake_core::{FileCandidate, StagedFile};
use tokio::sync::{Mutex, MutexGuard};

use crate::staging::StagingManager;

/// State of one client's upload session: the staged selection plus the busy and
/// completion flags of the current batch.
///
/// Staging operations never look at `is_uploading`; only a commit claims it.
#[derive(Debug, Default)]
pub struct UploadSession {
    staging: Mutex<StagingManager>,
    is_uploading: AtomicBool,
    upload_complete: AtomicBool,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage every admitted candidate; returns how many were admitted.
    pub async fn add_files<I>(&self, candidates: I) -> usize
    where
        I: IntoIterator<Item = FileCandidate>,
    {
        self.staging.lock().await.add_files(candidates)
    }

    /// Remove the staged file at `index`. Out of range is a no-op.
    pub async fn remove_file(&self, index: usize) -> Option<StagedFile> {
        self.staging.lock().await.remove_file(index)
    }

    /// Snapshot of the staged files in upload order.
    pub async fn staged_files(&self) -> Vec<StagedFile> {
        self.staging.lock().await.files().to_vec()
    }

    pub async fn staged_count(&self) -> usize {
        self.staging.lock().await.len()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading.load(Ordering::Acquire)
    }

    pub fn upload_complete(&self) -> bool {
        self.upload_complete.load(Ordering::Acquire)
    }

    pub(crate) async fn staging(&self) -> MutexGuard<'_, StagingManager> {
        self.staging.lock().await
    }

    pub(crate) fn set_upload_complete(&self, complete: bool) {
        self.upload_complete.store(complete, Ordering::Release);
    }

    /// Claim the session for a commit. Returns `None` if a commit already holds it.
    pub(crate) fn begin_upload(&self) -> Option<UploadingGuard<'_>> {
        self.is_uploading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| UploadingGuard {
                flag: &self.is_uploading,
            })
    }
}

/// Releases `is_uploading` when dropped: on success, on error, and when the commit
/// future is dropped mid-flight.
pub(crate) struct UploadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
