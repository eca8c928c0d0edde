use std::io;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Client errors reported over the upload channel
    #[error("malformed filename announcement: {0}")]
    MalformedAnnouncement(String), // Contains the raw announcement

    #[error("invalid filename: {0}")]
    InvalidFilename(String), // Contains the rejected name

    #[error("channel error: {0}")]
    Channel(String),

    #[error("{0} not found")]
    NotFound(String),

    // Internal Errors
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Text frame sent back to an upload client when the exchange fails.
    pub fn channel_message(&self) -> String {
        format!("Error: {self}")
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedAnnouncement(_) | Self::InvalidFilename(_) | Self::Channel(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Sqlx(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<axum::Error> for AppError {
    fn from(err: axum::Error) -> Self {
        AppError::Channel(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Generating response for AppError: {:?}", self);

        let status_code = self.status_code();
        let message = if status_code.is_server_error() {
            "an internal server error occurred".to_string()
        } else {
            self.to_string()
        };
        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
