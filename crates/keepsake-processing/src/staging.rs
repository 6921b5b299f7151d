//! File staging: the ordered selection of files waiting to be committed.
//!
//! Candidates that fail admission are dropped without surfacing an error; the rejection
//! reason is only logged at debug level.

use keepsake_core::constants::{
    ADMITTED_MEDIA_PREFIXES, MAX_STAGED_FILE_SIZE_BYTES, PROGRESS_COMPLETE,
};
use keepsake_core::{FileCandidate, StagedFile};
use uuid::Uuid;

/// Why a candidate was kept out of staging
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionRejection {
    #[error("File has no name")]
    MissingName,

    #[error("Unsupported media type: {0} (only image/* and video/* are accepted)")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// Ordered set of files pending upload. Insertion order is upload order.
#[derive(Debug, Default)]
pub struct StagingManager {
    files: Vec<StagedFile>,
}

impl StagingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a candidate against the admission rules: named, `image/*` or `video/*`,
    /// and a payload of at most 100 MiB.
    pub fn check(candidate: &FileCandidate) -> Result<(), AdmissionRejection> {
        Self::check_attributes(
            &candidate.name,
            &candidate.mime_type,
            candidate.size_bytes(),
        )
    }

    /// Admission rules applied to a file's attributes alone, before its content is read.
    pub fn check_attributes(
        name: &str,
        mime_type: &str,
        size_bytes: u64,
    ) -> Result<(), AdmissionRejection> {
        if name.is_empty() {
            return Err(AdmissionRejection::MissingName);
        }

        if !ADMITTED_MEDIA_PREFIXES
            .iter()
            .any(|prefix| mime_type.starts_with(*prefix))
        {
            return Err(AdmissionRejection::UnsupportedType(mime_type.to_string()));
        }

        if size_bytes > MAX_STAGED_FILE_SIZE_BYTES {
            return Err(AdmissionRejection::TooLarge {
                size: size_bytes,
                max: MAX_STAGED_FILE_SIZE_BYTES,
            });
        }

        Ok(())
    }

    pub fn admits(candidate: &FileCandidate) -> bool {
        Self::check(candidate).is_ok()
    }

    /// Append every admitted candidate, preserving input order, and return how many
    /// were admitted.
    pub fn add_files<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = FileCandidate>,
    {
        let before = self.files.len();

        for candidate in candidates {
            match Self::check(&candidate) {
                Ok(()) => self.files.push(StagedFile::from_candidate(candidate)),
                Err(reason) => {
                    tracing::debug!(
                        file_name = %candidate.name,
                        mime_type = %candidate.mime_type,
                        size_bytes = candidate.size_bytes(),
                        reason = %reason,
                        "Candidate not staged"
                    );
                }
            }
        }

        self.files.len() - before
    }

    /// Remove the file at `index`, shifting later files down by one.
    /// An out-of-range index is a no-op and returns `None`.
    pub fn remove_file(&mut self, index: usize) -> Option<StagedFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }

    /// Mark the file with `id` as fully uploaded. Returns false if it is no longer staged.
    pub(crate) fn mark_uploaded(&mut self, id: Uuid) -> bool {
        match self.files.iter_mut().find(|f| f.id == id) {
            Some(file) => {
                file.set_progress(PROGRESS_COMPLETE);
                true
            }
            None => false,
        }
    }

    /// Drop the files of a committed batch; anything staged since stays queued.
    pub(crate) fn remove_committed(&mut self, ids: &[Uuid]) {
        self.files.retain(|f| !ids.contains(&f.id));
    }
}
