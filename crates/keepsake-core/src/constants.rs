//! Shared constants for staging and upload.

/// Largest file (in bytes) admitted into staging: 100 MiB.
pub const MAX_STAGED_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Media type prefixes admitted into staging.
pub const ADMITTED_MEDIA_PREFIXES: &[&str] = &["image/", "video/"];

/// Default bucket that receives uploaded media.
pub const DEFAULT_UPLOAD_BUCKET: &str = "wedding-files";

/// Default lifetime of a download link, counted from the commit's context date.
pub const DEFAULT_LINK_RETENTION_DAYS: i64 = 7;

/// Route prefix under which download links are served.
pub const DOWNLOAD_ROUTE_PREFIX: &str = "/download";

/// Progress value of a staged file whose upload has finished.
pub const PROGRESS_COMPLETE: u8 = 100;
