use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gurl_shortener::ShortenerError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        match error {
            ShortenerError::InvalidUrl(_) | ShortenerError::InvalidKey(_) => {
                AppError::BadRequest(error.to_string())
            }
            ShortenerError::NotFound(_) => AppError::NotFound("link not found".to_string()),
            ShortenerError::Unauthorized(_) => {
                AppError::Forbidden("deletion token rejected".to_string())
            }
            ShortenerError::CollisionsExhausted { .. } => AppError::Unavailable(error.to_string()),
            ShortenerError::InvalidSettings(_) | ShortenerError::Storage(_) => {
                AppError::Internal(error.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
