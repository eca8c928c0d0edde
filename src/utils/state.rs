use crate::config::Config;
use crate::domain::upload::{SqliteUploadRepository, UploadRepository};
use crate::storage::{Storage, driver::filesystem::FilesystemStorage};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub upload_storage: Arc<dyn UploadRepository>,
    pub config: Arc<Config>,
    // Held while a transfer is committed into the staging directory and
    // while an archiver pass runs.
    staging: Arc<Mutex<()>>,
}

impl AppState {
    pub async fn new(config: Config, pool: Arc<SqlitePool>) -> Result<Self, crate::error::AppError> {
        let storage = FilesystemStorage::new(&config.root_dir);
        storage.init().await?;
        let upload_storage = SqliteUploadRepository::new(pool);
        upload_storage.ensure_schema().await?;

        Ok(AppState {
            storage: Arc::new(storage),
            upload_storage: Arc::new(upload_storage),
            config: Arc::new(config),
            staging: Arc::new(Mutex::new(())),
        })
    }

    pub async fn lock_staging(&self) -> MutexGuard<'_, ()> {
        self.staging.lock().await
    }
}
