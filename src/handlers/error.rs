use axum::{
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 画面に表示する前に失敗したリクエスト
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Multipart(e) => {
                tracing::warn!("Multipart error: {}", e);
                (e.status(), e.body_text())
            }
        };

        (status, message).into_response()
    }
}
