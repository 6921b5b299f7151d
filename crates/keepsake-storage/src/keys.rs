//! Shared path generation for storage backends.
//!
//! Path format: `{YYYY-MM-DD}/{suffix}.{ext}`; the extension is dropped when the uploaded
//! file name has none.

use chrono::{DateTime, Utc};

use crate::{StorageError, StorageResult};

/// Extension of `file_name`: the text after its last `.`.
///
/// Returns `None` when the name has no `.`, ends with `.`, or the text after the last `.`
/// contains a path separator. A leading-dot name such as `.mov` yields `Some("mov")`.
pub fn file_extension(file_name: &str) -> Option<&str> {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains(['/', '\\']) => Some(ext),
        _ => None,
    }
}

/// Date-derived directory for a commit.
pub fn date_prefix(context_date: DateTime<Utc>) -> String {
    context_date.format("%Y-%m-%d").to_string()
}

/// Generate the storage path of one uploaded file.
pub fn storage_path(context_date: DateTime<Utc>, suffix: &str, file_name: &str) -> String {
    let prefix = date_prefix(context_date);
    match file_extension(file_name) {
        Some(ext) => format!("{}/{}.{}", prefix, suffix, ext),
        None => format!("{}/{}", prefix, suffix),
    }
}

/// Reject keys that are empty, absolute, or could escape their bucket.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wedding_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 20, 17, 45, 0).unwrap()
    }

    #[test]
    fn extension_is_text_after_last_dot() {
        assert_eq!(file_extension("IMG_0042.JPG"), Some("JPG"));
        assert_eq!(file_extension("clip.final.mp4"), Some("mp4"));
        assert_eq!(file_extension(".mov"), Some("mov"));
    }

    #[test]
    fn missing_or_trailing_dot_has_no_extension() {
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("photo."), None);
        assert_eq!(file_extension("dir.d/file"), None);
    }

    #[test]
    fn path_combines_date_suffix_and_extension() {
        assert_eq!(
            storage_path(wedding_day(), "1781977500000-k3x9qa", "vows.mp4"),
            "2026-06-20/1781977500000-k3x9qa.mp4"
        );
    }

    #[test]
    fn path_without_extension_has_no_trailing_dot() {
        assert_eq!(
            storage_path(wedding_day(), "1781977500000-k3x9qa", "IMG_0001"),
            "2026-06-20/1781977500000-k3x9qa"
        );
    }

    #[test]
    fn validate_key_rejects_traversal() {
        assert!(validate_key("2026-06-20/a.jpg").is_ok());
        assert!(matches!(validate_key("../etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key("/etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
    }
}
