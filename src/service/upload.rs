use crate::domain::upload::{NewUpload, UploadRecord};
use crate::error::AppError;
use crate::service::channel::{Frame, UploadChannel};
use crate::utils::state::AppState;
use crate::utils::validation::parse_announcement;
use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// GET /ws
pub async fn upload_ws_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        handle_upload(state, socket).await;
    })
}

/// Runs one upload exchange: announcement, binary chunks, acknowledgement.
/// The channel is closed on every path. Returns the stored record on success.
pub async fn handle_upload<C: UploadChannel>(
    state: Arc<AppState>,
    mut channel: C,
) -> Option<UploadRecord> {
    let outcome = receive_upload(&state, &mut channel).await;

    let message = match &outcome {
        Ok(record) => format!(
            "File {} uploaded successfully as {}",
            record.original_filename, record.saved_filename
        ),
        Err(err) => {
            warn!("upload failed: {err}");
            err.channel_message()
        }
    };
    if let Err(err) = channel.send_text(message).await {
        debug!("acknowledgement not delivered: {err}");
    }
    if let Err(err) = channel.close().await {
        debug!("closing upload channel: {err}");
    }

    outcome.ok()
}

async fn receive_upload<C: UploadChannel>(
    state: &AppState,
    channel: &mut C,
) -> Result<UploadRecord, AppError> {
    let original_filename = await_announcement(channel).await?;
    let transfer_id = Uuid::new_v4().to_string();
    debug!(%transfer_id, %original_filename, "receiving upload");

    let result = receive_transfer(state, channel, &transfer_id, &original_filename).await;
    if result.is_err() {
        if let Err(err) = state.storage.discard_partial(&transfer_id).await {
            warn!("failed to discard partial transfer {transfer_id}: {err}");
        }
    }
    result
}

async fn await_announcement<C: UploadChannel>(channel: &mut C) -> Result<String, AppError> {
    match channel.recv_frame().await {
        Some(Ok(Frame::Text(announcement))) => parse_announcement(&announcement),
        Some(Ok(Frame::Binary(_))) => Err(AppError::MalformedAnnouncement(
            "expected a text frame, got binary data".to_string(),
        )),
        Some(Ok(Frame::Close)) | None => Err(AppError::Channel(
            "closed before a filename was announced".to_string(),
        )),
        Some(Err(err)) => Err(err),
    }
}

async fn receive_transfer<C: UploadChannel>(
    state: &AppState,
    channel: &mut C,
    transfer_id: &str,
    original_filename: &str,
) -> Result<UploadRecord, AppError> {
    let file = state.storage.create_partial(transfer_id).await?;
    let mut writer = BufWriter::new(file);
    let mut received: u64 = 0;

    loop {
        match channel.recv_frame().await {
            // a zero-length frame is the browser client's end-of-stream marker
            Some(Ok(Frame::Binary(chunk))) if chunk.is_empty() => break,
            Some(Ok(Frame::Binary(chunk))) => {
                writer.write_all(&chunk).await?;
                received += chunk.len() as u64;
            }
            Some(Ok(Frame::Text(_))) if state.config.legacy_parity => {
                return Err(AppError::Channel(
                    "expected binary data, got a text frame".to_string(),
                ));
            }
            Some(Ok(Frame::Text(_))) | Some(Ok(Frame::Close)) | None => break,
            Some(Err(err)) => return Err(err),
        }
    }
    writer.flush().await?;
    drop(writer);

    let _staging = state.lock_staging().await;
    let saved_filename = state
        .storage
        .commit_partial(transfer_id, original_filename)
        .await?;
    let record = state
        .upload_storage
        .insert_upload(NewUpload::pending(original_filename, &saved_filename))
        .await?;

    info!(
        id = record.id,
        %original_filename,
        saved_filename = %record.saved_filename,
        bytes = received,
        "upload stored"
    );
    Ok(record)
}
