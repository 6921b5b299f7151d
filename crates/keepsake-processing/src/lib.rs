//! Keepsake Processing Library
//!
//! Client-side staging of media files and the sequential commit pipeline that uploads a
//! staged batch, records per-file metadata and issues a download link.

pub mod staging;
pub mod upload;

pub use staging::{AdmissionRejection, StagingManager};
pub use upload::{
    RandomTokenGenerator, TokenGenerator, UploadError, UploadOrchestrator, UploadSession,
    UploadSettings,
};
