// PathManager maps staged files and in-flight transfers to paths.
//
// The on-disk layout under the configured root is:
//
//	<root>
//	├── uploads
//	│   └── <saved filename>
//	└── partial
//	    └── <transfer uuid>
//
// `uploads` is the staging directory: it only ever holds complete files,
// which stay there until an archiver pass removes them. Bytes of a transfer
// that is still running live in `partial` and are renamed into `uploads`
// once the transfer ends.

use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct PathManager {
    root_path: PathBuf,
}

impl PathManager {
    pub fn new(root: impl AsRef<Path>) -> Self {
        PathManager {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the staging directory,
    /// (e.g. `<root>/uploads`).
    pub fn uploads_path(&self) -> PathBuf {
        self.root_path.join("uploads")
    }

    /// Returns the path to a single staged file,
    /// (e.g. `<root>/uploads/<name>`).
    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.uploads_path().join(name)
    }

    /// Returns the path to the root of in-flight transfers,
    /// (e.g. `<root>/partial`).
    pub fn partials_path(&self) -> PathBuf {
        self.root_path.join("partial")
    }

    /// Returns the path to the data of a single in-flight transfer,
    /// (e.g. `<root>/partial/<id>`).
    pub fn partial_path(&self, id: &str) -> PathBuf {
        self.partials_path().join(id)
    }
}
