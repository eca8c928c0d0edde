use crate::domain::upload::UploadRecord;
use crate::error::AppError;
use crate::utils::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

/// GET /files
pub async fn list_files_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UploadRecord>>, AppError> {
    let records = state.upload_storage.list_uploads().await?;
    Ok(Json(records))
}

/// GET /files/{id}
pub async fn get_file_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UploadRecord>, AppError> {
    let record = state.upload_storage.query_upload_by_id(id).await?;
    Ok(Json(record))
}
