use bytes::Bytes;
use uuid::Uuid;

use crate::constants::PROGRESS_COMPLETE;

/// A raw file-like input offered for staging.
///
/// The size is always the payload length; there is no separately declared size to
/// disagree with the bytes that get uploaded.
#[derive(Clone, Debug)]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: String,
    pub payload: Bytes,
}

impl FileCandidate {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.payload.len() as u64
    }
}

/// One file queued for transfer.
///
/// `payload` is a reference-counted buffer: the upload hands a cheap clone to the blob
/// store, so the staged copy survives a failed commit and can be retried.
#[derive(Clone, Debug)]
pub struct StagedFile {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub progress_percent: u8,
    pub payload: Bytes,
}

impl StagedFile {
    pub fn from_candidate(candidate: FileCandidate) -> Self {
        let size_bytes = candidate.size_bytes();
        Self {
            id: Uuid::new_v4(),
            name: candidate.name,
            mime_type: candidate.mime_type,
            size_bytes,
            progress_percent: 0,
            payload: candidate.payload,
        }
    }

    /// Raise progress to `percent` (capped at 100). Progress never moves backwards.
    pub fn set_progress(&mut self, percent: u8) {
        let percent = percent.min(PROGRESS_COMPLETE);
        if percent > self.progress_percent {
            self.progress_percent = percent;
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.progress_percent >= PROGRESS_COMPLETE
    }
}
