//! Test helpers: in-memory blob store, metadata store and token generator that record
//! every call into a shared event log so tests can assert call order.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use keepsake_core::{AppError, DownloadLinkRecord, FileCandidate, UploadMetadataRecord};
use keepsake_db::MetadataStore;
use keepsake_processing::{TokenGenerator, UploadOrchestrator, UploadSession, UploadSettings};
use keepsake_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Shared, ordered log of collaborator calls.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

/// Blocks an upload until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Clone, Debug)]
pub struct StoredBlob {
    pub bucket: String,
    pub path: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Mock storage that keeps uploads in memory
pub struct RecordingStorage {
    log: EventLog,
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
    gate: Option<Arc<Gate>>,
    blobs: Mutex<Vec<StoredBlob>>,
}

impl RecordingStorage {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            calls: AtomicUsize::new(0),
            fail_on_call: None,
            gate: None,
            blobs: Mutex::new(Vec::new()),
        }
    }

    /// Fail the `n`-th upload call (1-based, counted across commits).
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn blobs(&self) -> Vec<StoredBlob> {
        self.blobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if self.fail_on_call == Some(call) {
            self.log.push(format!("upload_failed:{}", path));
            return Err(StorageError::UploadFailed("bucket quota exceeded".to_string()));
        }

        self.log.push(format!("upload:{}", path));
        self.blobs.lock().unwrap().push(StoredBlob {
            bucket: bucket.to_string(),
            path: path.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        Ok(format!("memory://{}/{}", bucket, path))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Mock metadata store that keeps records in memory
pub struct RecordingMetadataStore {
    log: EventLog,
    upload_calls: AtomicUsize,
    fail_upload_on_call: Option<usize>,
    fail_links: bool,
    uploads: Mutex<Vec<UploadMetadataRecord>>,
    links: Mutex<Vec<DownloadLinkRecord>>,
}

impl RecordingMetadataStore {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            upload_calls: AtomicUsize::new(0),
            fail_upload_on_call: None,
            fail_links: false,
            uploads: Mutex::new(Vec::new()),
            links: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_upload_insert_on(mut self, n: usize) -> Self {
        self.fail_upload_on_call = Some(n);
        self
    }

    pub fn failing_links(mut self) -> Self {
        self.fail_links = true;
        self
    }

    pub fn uploads(&self) -> Vec<UploadMetadataRecord> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn links(&self) -> Vec<DownloadLinkRecord> {
        self.links.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataStore for RecordingMetadataStore {
    async fn insert_upload(&self, record: &UploadMetadataRecord) -> Result<(), AppError> {
        let call = self.upload_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_upload_on_call == Some(call) {
            self.log.push(format!("insert_upload_failed:{}", record.file_path));
            return Err(AppError::Internal("connection reset".to_string()));
        }

        self.log.push(format!("insert_upload:{}", record.file_path));
        self.uploads.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn insert_download_link(&self, link: &DownloadLinkRecord) -> Result<(), AppError> {
        if self.fail_links {
            self.log.push(format!("insert_link_failed:{}", link.token));
            return Err(AppError::Internal("unique violation".to_string()));
        }

        self.log.push(format!("insert_link:{}", link.token));
        self.links.lock().unwrap().push(link.clone());
        Ok(())
    }
}

/// Deterministic generator: `suffix-1`, `suffix-2`, … and `token-1`, `token-2`, …
#[derive(Default)]
pub struct SequentialTokens {
    suffixes: AtomicUsize,
    tokens: AtomicUsize,
}

impl SequentialTokens {
    pub fn suffix_calls(&self) -> usize {
        self.suffixes.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.tokens.load(Ordering::SeqCst)
    }
}

impl TokenGenerator for SequentialTokens {
    fn path_suffix(&self) -> String {
        format!("suffix-{}", self.suffixes.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn link_token(&self) -> String {
        format!("token-{}", self.tokens.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Orchestrator wired to recording fakes.
pub struct TestRig {
    pub log: EventLog,
    pub session: Arc<UploadSession>,
    pub storage: Arc<RecordingStorage>,
    pub metadata: Arc<RecordingMetadataStore>,
    pub tokens: Arc<SequentialTokens>,
    pub orchestrator: Arc<UploadOrchestrator>,
}

impl TestRig {
    pub fn new() -> Self {
        let log = EventLog::default();
        Self::with(
            log.clone(),
            RecordingStorage::new(log.clone()),
            RecordingMetadataStore::new(log),
            UploadSettings::default(),
        )
    }

    pub fn with(
        log: EventLog,
        storage: RecordingStorage,
        metadata: RecordingMetadataStore,
        settings: UploadSettings,
    ) -> Self {
        let session = Arc::new(UploadSession::new());
        let storage = Arc::new(storage);
        let metadata = Arc::new(metadata);
        let tokens = Arc::new(SequentialTokens::default());
        let orchestrator = Arc::new(UploadOrchestrator::new(
            session.clone(),
            storage.clone(),
            metadata.clone(),
            tokens.clone(),
            settings,
        ));

        Self {
            log,
            session,
            storage,
            metadata,
            tokens,
            orchestrator,
        }
    }

    pub async fn progress(&self) -> Vec<u8> {
        self.session
            .staged_files()
            .await
            .iter()
            .map(|f| f.progress_percent)
            .collect()
    }
}

pub fn wedding_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 20, 14, 0, 0).unwrap()
}

pub fn image(name: &str) -> FileCandidate {
    FileCandidate::new(name, "image/jpeg", format!("jpeg:{}", name).into_bytes())
}

pub fn video(name: &str) -> FileCandidate {
    FileCandidate::new(name, "video/mp4", format!("mp4:{}", name).into_bytes())
}
