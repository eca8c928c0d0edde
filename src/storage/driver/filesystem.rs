use std::collections::HashSet;
use std::path::Path;

use crate::storage::Storage;
use crate::storage::paths::PathManager;
use crate::utils::filename::resolve_unique_name;

use tokio::{
    fs::{File, create_dir_all, read_dir, remove_file, rename},
    io,
};

pub struct FilesystemStorage {
    path_manager: PathManager,
}

impl FilesystemStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        FilesystemStorage {
            path_manager: PathManager::new(root),
        }
    }

    pub fn path_manager(&self) -> &PathManager {
        &self.path_manager
    }
}

#[async_trait::async_trait]
impl Storage for FilesystemStorage {
    async fn init(&self) -> io::Result<()> {
        create_dir_all(self.path_manager.uploads_path()).await?;
        create_dir_all(self.path_manager.partials_path()).await?;
        Ok(())
    }

    async fn create_partial(&self, id: &str) -> io::Result<File> {
        create_dir_all(self.path_manager.partials_path()).await?;
        File::create(self.path_manager.partial_path(id)).await
    }

    async fn commit_partial(&self, id: &str, requested: &str) -> io::Result<String> {
        let present: HashSet<String> = self.list_staged().await?.into_iter().collect();
        let saved = resolve_unique_name(requested, |candidate| present.contains(candidate));
        rename(
            self.path_manager.partial_path(id),
            self.path_manager.upload_path(&saved),
        )
        .await?;
        Ok(saved)
    }

    async fn discard_partial(&self, id: &str) -> io::Result<()> {
        match remove_file(self.path_manager.partial_path(id)).await {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    async fn list_staged(&self) -> io::Result<Vec<String>> {
        let mut entries = vec![];
        let mut read_dir = read_dir(self.path_manager.uploads_path()).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(file_name_str) = entry.file_name().to_str() {
                entries.push(file_name_str.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    async fn remove_staged(&self, name: &str) -> io::Result<bool> {
        match remove_file(self.path_manager.upload_path(name)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}
