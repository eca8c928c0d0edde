use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Recorded, but the file still sits in the staging directory.
    Pending,
    /// The staged file has been swept by an archiver pass.
    Archived,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: i64,
    pub original_filename: String,
    pub saved_filename: String,
    pub upload_time: DateTime<Utc>,
    pub status: UploadStatus,
}

/// A row to insert; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub original_filename: String,
    pub saved_filename: String,
    pub upload_time: DateTime<Utc>,
    pub status: UploadStatus,
}

impl NewUpload {
    /// A completed channel transfer whose file is still staged.
    pub fn pending(original_filename: impl Into<String>, saved_filename: impl Into<String>) -> Self {
        Self {
            original_filename: original_filename.into(),
            saved_filename: saved_filename.into(),
            upload_time: Utc::now(),
            status: UploadStatus::Pending,
        }
    }

    /// A staged file found by an archiver pass, recorded under its own name
    /// with the scan time.
    pub fn swept(filename: impl Into<String>, scanned_at: DateTime<Utc>) -> Self {
        let filename = filename.into();
        Self {
            original_filename: filename.clone(),
            saved_filename: filename,
            upload_time: scanned_at,
            status: UploadStatus::Archived,
        }
    }
}
