//! Keepsake metadata store
//!
//! Insert-only persistence for upload metadata and download links. The orchestrator talks
//! to the `MetadataStore` trait; `PgMetadataStore` backs it with Postgres repositories.

pub mod db;
pub mod setup;
pub mod store;

pub use db::{DownloadLinkRepository, UploadRepository};
pub use setup::{run_migrations, setup_database};
pub use store::{MetadataStore, PgMetadataStore};
