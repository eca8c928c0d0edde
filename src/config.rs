use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub root_dir: PathBuf,
    pub db_url: String,
    pub archive_interval: Duration,
    pub cors_origin: String,
    /// Reproduce the record-every-file archiver of the original service and
    /// reject text frames in the middle of a transfer.
    pub legacy_parity: bool,
}

impl Config {
    /// Configuration rooted at `root_dir`, with the remaining fields at their defaults.
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        let db_url = format!("sqlite://{}", root_dir.join("files.db").display());
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            root_dir,
            db_url,
            archive_interval: Duration::from_secs(60),
            cors_origin: "http://localhost:3000".to_string(),
            legacy_parity: false,
        }
    }
}

/// Path of the database file behind a `sqlite:` url, if it names one.
pub fn sqlite_file_path(db_url: &str) -> Option<PathBuf> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path).to_path_buf())
}
