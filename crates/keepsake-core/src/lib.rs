//! Keepsake Core Library
//!
//! This crate provides the domain models, error types, configuration and constants
//! shared by the staging, storage and metadata crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::AppError;
pub use models::{DownloadLinkRecord, FileCandidate, StagedFile, UploadMetadataRecord};
pub use storage_types::StorageBackend;
