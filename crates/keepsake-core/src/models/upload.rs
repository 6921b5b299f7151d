use serde::{Deserialize, Serialize};

use super::StagedFile;

/// Metadata row written once per uploaded file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadataRecord {
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
}

impl UploadMetadataRecord {
    pub fn for_staged(file: &StagedFile, file_path: impl Into<String>) -> Self {
        Self {
            file_name: file.name.clone(),
            file_path: file_path.into(),
            file_type: file.mime_type.clone(),
            file_size: i64::try_from(file.size_bytes).unwrap_or(i64::MAX),
        }
    }
}
