//! Helpers shared by the `keepsake` binary: tracing setup, probing and reading files from
//! disk into staging candidates, and the JSON shapes printed to stdout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use keepsake_core::{DownloadLinkRecord, FileCandidate};
use keepsake_processing::{AdmissionRejection, StagingManager};
use serde::Serialize;
use tokio::io::AsyncReadExt;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
/// Leading bytes read for type sniffing. Every media signature `infer` knows fits in it.
const SNIFF_LEN: u64 = 8 * 1024;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Media type sniffed from the file's leading bytes.
pub fn detect_mime_type(data: &[u8]) -> String {
    infer::get(data)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}

/// What is known about a file on disk before its content is loaded.
#[derive(Debug, Clone)]
pub struct FileProbe {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileProbe {
    pub fn admission(&self) -> Result<(), AdmissionRejection> {
        StagingManager::check_attributes(&self.name, &self.mime_type, self.size_bytes)
    }
}

/// Size from filesystem metadata and type from a bounded header read; the rest of the
/// file is not touched.
pub async fn probe_file(path: &Path) -> anyhow::Result<FileProbe> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN)
        .read_to_end(&mut header)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileProbe {
        path: path.to_path_buf(),
        name,
        mime_type: detect_mime_type(&header),
        size_bytes: metadata.len(),
    })
}

/// Load a probed file into a staging candidate. Staging re-checks the size against the
/// bytes actually read.
pub async fn read_candidate(probe: &FileProbe) -> anyhow::Result<FileCandidate> {
    let data = tokio::fs::read(&probe.path)
        .await
        .with_context(|| format!("Failed to read {}", probe.path.display()))?;

    Ok(FileCandidate::new(probe.name.clone(), probe.mime_type.clone(), data))
}

/// Midnight UTC of an event date, or now when none is given.
pub fn context_date(event_date: Option<NaiveDate>) -> DateTime<Utc> {
    match event_date {
        Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        None => Utc::now(),
    }
}

/// Absolute link when a public base URL is configured, otherwise the bare route path.
pub fn download_url(public_base_url: Option<&str>, link: &DownloadLinkRecord) -> String {
    match public_base_url {
        Some(base) => format!("{}{}", base.trim_end_matches('/'), link.download_path()),
        None => link.download_path(),
    }
}

/// Admission verdict for one file, as printed by `keepsake check`.
#[derive(Debug, Serialize)]
pub struct AdmissionReport {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub admitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AdmissionReport {
    pub fn for_probe(probe: &FileProbe) -> Self {
        let verdict = probe.admission();
        Self {
            name: probe.name.clone(),
            mime_type: probe.mime_type.clone(),
            size_bytes: probe.size_bytes,
            admitted: verdict.is_ok(),
            reason: verdict.err().map(|r| r.to_string()),
        }
    }
}

/// Result of `keepsake upload`.
#[derive(Debug, Serialize)]
pub struct CommitSummary {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub download_url: String,
    pub uploaded_files: usize,
    pub skipped_files: Vec<String>,
}
