//! Database repositories
//!
//! One repository per table. Queries are checked at runtime so the crate builds without
//! a live database.

pub mod download_link;
pub mod upload;

pub use download_link::DownloadLinkRepository;
pub use upload::UploadRepository;
