use keepsake_core::{AppError, UploadMetadataRecord};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for the `uploads` table
#[derive(Clone)]
pub struct UploadRepository {
    pool: PgPool,
}

impl UploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one upload metadata row and return its generated id
    pub async fn insert(&self, record: &UploadMetadataRecord) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO uploads (file_name, file_path, file_type, file_size)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&record.file_name)
        .bind(&record.file_path)
        .bind(&record.file_type)
        .bind(record.file_size)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
