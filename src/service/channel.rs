use axum::body::Bytes;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use crate::error::AppError;

/// A frame received from an upload client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
    Close,
}

/// The bidirectional connection an upload runs over.
#[async_trait::async_trait]
pub trait UploadChannel: Send {
    /// Next frame from the client, `None` once the transport has ended.
    async fn recv_frame(&mut self) -> Option<Result<Frame, AppError>>;

    async fn send_text(&mut self, text: String) -> Result<(), AppError>;

    async fn close(&mut self) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl<C: UploadChannel + ?Sized> UploadChannel for &mut C {
    async fn recv_frame(&mut self) -> Option<Result<Frame, AppError>> {
        (**self).recv_frame().await
    }

    async fn send_text(&mut self, text: String) -> Result<(), AppError> {
        (**self).send_text(text).await
    }

    async fn close(&mut self) -> Result<(), AppError> {
        (**self).close().await
    }
}

#[async_trait::async_trait]
impl UploadChannel for WebSocket {
    async fn recv_frame(&mut self) -> Option<Result<Frame, AppError>> {
        loop {
            let frame = match self.recv().await? {
                Ok(Message::Text(text)) => Frame::Text(text.as_str().to_owned()),
                Ok(Message::Binary(data)) => Frame::Binary(data),
                Ok(Message::Close(_)) => Frame::Close,
                // answered by the transport
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Err(err) => return Some(Err(err.into())),
            };
            return Some(Ok(frame));
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), AppError> {
        self.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AppError> {
        self.send(Message::Close(Some(CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        })))
        .await?;
        Ok(())
    }
}
