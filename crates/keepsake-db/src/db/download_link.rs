use keepsake_core::{AppError, DownloadLinkRecord};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the `download_links` table
#[derive(Clone)]
pub struct DownloadLinkRepository {
    pool: PgPool,
}

impl DownloadLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, link: &DownloadLinkRecord) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO download_links (link_token, expires_at)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&link.token)
        .bind(link.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
