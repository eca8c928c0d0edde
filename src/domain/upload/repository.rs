use crate::domain::upload::{NewUpload, UploadRecord, UploadStatus};
use crate::error::AppError;
use sqlx::SqlitePool;
use std::sync::Arc;

type Result<T> = std::result::Result<T, AppError>;

const RECORD_COLUMNS: &str = "id, original_filename, saved_filename, upload_time, status";

#[async_trait::async_trait]
pub trait UploadRepository: Send + Sync {
    /// Creates the `files` table if it does not exist yet.
    async fn ensure_schema(&self) -> Result<()>;

    async fn insert_upload(&self, upload: NewUpload) -> Result<UploadRecord>;

    /// Every record, most recent first.
    async fn list_uploads(&self) -> Result<Vec<UploadRecord>>;

    async fn query_upload_by_id(&self, id: i64) -> Result<UploadRecord>;

    async fn list_pending(&self) -> Result<Vec<UploadRecord>>;

    /// Marks `settled` records archived and inserts `swept` rows, atomically.
    async fn record_archive_pass(&self, settled: &[i64], swept: Vec<NewUpload>) -> Result<()>;
}

#[derive(Debug)]
pub struct SqliteUploadRepository {
    pub pool: Arc<SqlitePool>,
}

impl SqliteUploadRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UploadRepository for SqliteUploadRepository {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                original_filename TEXT NOT NULL,
                saved_filename TEXT NOT NULL,
                upload_time TIMESTAMP NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn insert_upload(&self, upload: NewUpload) -> Result<UploadRecord> {
        let record = sqlx::query_as::<_, UploadRecord>(&format!(
            "INSERT INTO files (original_filename, saved_filename, upload_time, status) \
             VALUES ($1, $2, $3, $4) RETURNING {RECORD_COLUMNS}"
        ))
        .bind(upload.original_filename)
        .bind(upload.saved_filename)
        .bind(upload.upload_time)
        .bind(upload.status)
        .fetch_one(self.pool.as_ref())
        .await?;
        Ok(record)
    }

    async fn list_uploads(&self) -> Result<Vec<UploadRecord>> {
        let records = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM files ORDER BY upload_time DESC, id DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(records)
    }

    async fn query_upload_by_id(&self, id: i64) -> Result<UploadRecord> {
        sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM files WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("upload {id}")))
    }

    async fn list_pending(&self) -> Result<Vec<UploadRecord>> {
        let records = sqlx::query_as::<_, UploadRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM files WHERE status = $1 ORDER BY id"
        ))
        .bind(UploadStatus::Pending)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(records)
    }

    async fn record_archive_pass(&self, settled: &[i64], swept: Vec<NewUpload>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for id in settled {
            sqlx::query("UPDATE files SET status = $1 WHERE id = $2")
                .bind(UploadStatus::Archived)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        for upload in swept {
            sqlx::query(
                "INSERT INTO files (original_filename, saved_filename, upload_time, status) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(upload.original_filename)
            .bind(upload.saved_filename)
            .bind(upload.upload_time)
            .bind(upload.status)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
