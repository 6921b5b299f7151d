//! Data models for staging, upload metadata and download links

mod download_link;
mod staged_file;
mod upload;

pub use download_link::DownloadLinkRecord;
pub use staged_file::{FileCandidate, StagedFile};
pub use upload::UploadMetadataRecord;
