use tokio::{fs::File, io};

pub mod driver;
pub mod paths;

/// The staging area: complete uploads waiting to be archived, plus the
/// scratch space used while a transfer is still running.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Creates the staging and scratch directories if they are missing.
    async fn init(&self) -> io::Result<()>;
    /// Creates an empty scratch file for the transfer `id`.
    async fn create_partial(&self, id: &str) -> io::Result<File>;
    /// Moves the scratch file of `id` into the staging directory under a
    /// collision-free variant of `requested` and returns the name used.
    async fn commit_partial(&self, id: &str, requested: &str) -> io::Result<String>;
    async fn discard_partial(&self, id: &str) -> io::Result<()>;
    /// Names of the regular files currently staged, sorted.
    async fn list_staged(&self) -> io::Result<Vec<String>>;
    /// Removes a staged file. Returns false if it was already gone.
    async fn remove_staged(&self, name: &str) -> io::Result<bool>;
}
