use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DOWNLOAD_ROUTE_PREFIX;
use crate::error::AppError;

/// A shareable download token issued once per committed batch.
///
/// Expiry is recorded here but enforced by whoever serves the link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLinkRecord {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl DownloadLinkRecord {
    /// Issue a link that expires `retention` after `context_date`.
    pub fn issue(
        token: impl Into<String>,
        context_date: DateTime<Utc>,
        retention: Duration,
    ) -> Result<Self, AppError> {
        let expires_at = context_date.checked_add_signed(retention).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Link expiry overflows: {} + {}s",
                context_date,
                retention.num_seconds()
            ))
        })?;

        Ok(Self {
            token: token.into(),
            expires_at,
        })
    }

    /// Path of the route that serves this link (`/download/{token}`).
    pub fn download_path(&self) -> String {
        format!("{}/{}", DOWNLOAD_ROUTE_PREFIX, self.token)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
