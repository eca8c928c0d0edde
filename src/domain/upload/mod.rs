mod model;
mod repository;

pub use model::{NewUpload, UploadRecord, UploadStatus};
pub use repository::{SqliteUploadRepository, UploadRepository};
