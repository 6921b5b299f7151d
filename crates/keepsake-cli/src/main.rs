//! Keepsake CLI: stage local media files, upload them as one batch and print the
//! download link.
//!
//! Set DATABASE_URL, and STORAGE_BACKEND=s3 with S3_REGION to leave the local default.
//! A `.env` file in the working directory is read first.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use keepsake_cli::{
    context_date, download_url, init_tracing, probe_file, read_candidate, AdmissionReport,
    CommitSummary,
};
use keepsake_core::Config;
use keepsake_db::{setup_database, PgMetadataStore};
use keepsake_processing::{RandomTokenGenerator, UploadOrchestrator, UploadSession, UploadSettings};
use keepsake_storage::create_storage;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "keepsake", about = "Upload event photos and videos and share one link")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload image and video files as one batch and issue a download link
    Upload {
        /// Event date used for the storage folder and link expiry (defaults to now)
        #[arg(long)]
        event_date: Option<NaiveDate>,
        /// Files to upload, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Report which files would be admitted for upload
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn upload(files: Vec<PathBuf>, event_date: Option<NaiveDate>) -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(backend = %storage.backend_type(), "Storage ready");
    let pool = setup_database(&config).await?;
    let metadata = Arc::new(PgMetadataStore::new(pool));

    let session = Arc::new(UploadSession::new());
    let orchestrator = UploadOrchestrator::new(
        session.clone(),
        storage,
        metadata,
        Arc::new(RandomTokenGenerator),
        UploadSettings::from_config(&config),
    );

    let mut candidates = Vec::with_capacity(files.len());
    let mut skipped_files = Vec::new();
    for path in &files {
        let probe = probe_file(path).await?;
        if let Err(reason) = probe.admission() {
            tracing::warn!(file = %path.display(), reason = %reason, "Skipping file");
            skipped_files.push(path.display().to_string());
            continue;
        }
        candidates.push(read_candidate(&probe).await?);
    }

    let admitted = session.add_files(candidates).await;
    if admitted == 0 {
        anyhow::bail!("None of the given files is an image or video within the size limit");
    }

    let link = orchestrator
        .commit(context_date(event_date))
        .await
        .context("Upload failed")?
        .context("Nothing was uploaded")?;

    print_json(&CommitSummary {
        download_url: download_url(config.public_base_url(), &link),
        token: link.token,
        expires_at: link.expires_at,
        uploaded_files: admitted,
        skipped_files,
    })
}

async fn check(files: Vec<PathBuf>) -> anyhow::Result<()> {
    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        let probe = probe_file(path).await?;
        reports.push(AdmissionReport::for_probe(&probe));
    }
    print_json(&reports)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { files, event_date } => upload(files, event_date).await,
        Commands::Check { files } => check(files).await,
    }
}
