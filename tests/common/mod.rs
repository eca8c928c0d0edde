#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use filedrop::api::create_router;
use filedrop::config::Config;
use filedrop::domain::upload::UploadRecord;
use filedrop::error::AppError;
use filedrop::service::channel::{Frame, UploadChannel};
use filedrop::service::upload::handle_upload;
use filedrop::utils::state::AppState;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

pub struct TestApp {
    pub dir: TempDir,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Contents of a file in the staging directory.
    pub async fn staged_bytes(&self, name: &str) -> Vec<u8> {
        tokio::fs::read(self.dir.path().join("uploads").join(name))
            .await
            .unwrap()
    }
}

pub async fn test_app(legacy_parity: bool) -> TestApp {
    test_app_with(|config| config.legacy_parity = legacy_parity).await
}

pub async fn test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_root(dir.path());
    configure(&mut config);

    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("files.db"))
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await.unwrap();
    let state = AppState::new(config, Arc::new(pool)).await.unwrap();

    TestApp {
        dir,
        state: Arc::new(state),
    }
}

/// Serves the app on an ephemeral local port.
pub async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An upload channel replaying scripted client frames.
#[derive(Default)]
pub struct MemoryChannel {
    incoming: VecDeque<Result<Frame, AppError>>,
    pub sent: Vec<String>,
    pub closed: bool,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: &str) -> Self {
        self.incoming.push_back(Ok(Frame::Text(text.to_string())));
        self
    }

    pub fn binary(mut self, data: &[u8]) -> Self {
        self.incoming
            .push_back(Ok(Frame::Binary(Bytes::copy_from_slice(data))));
        self
    }

    pub fn close_frame(mut self) -> Self {
        self.incoming.push_back(Ok(Frame::Close));
        self
    }

    pub fn failure(mut self, reason: &str) -> Self {
        self.incoming
            .push_back(Err(AppError::Channel(reason.to_string())));
        self
    }
}

#[async_trait::async_trait]
impl UploadChannel for MemoryChannel {
    async fn recv_frame(&mut self) -> Option<Result<Frame, AppError>> {
        self.incoming.pop_front()
    }

    async fn send_text(&mut self, text: String) -> Result<(), AppError> {
        if self.closed {
            return Err(AppError::Channel("channel already closed".to_string()));
        }
        self.sent.push(text);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AppError> {
        self.closed = true;
        Ok(())
    }
}

/// Drives `channel` through the upload handler and hands it back.
pub async fn run_upload(
    state: &Arc<AppState>,
    mut channel: MemoryChannel,
) -> (Option<UploadRecord>, MemoryChannel) {
    let record = handle_upload(state.clone(), &mut channel).await;
    (record, channel)
}

/// Polls `check` until it holds or the deadline passes.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
