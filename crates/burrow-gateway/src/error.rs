use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::ShortenerError;
use thiserror::Error;
use tracing::{error, warn};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid JSON")]
    InvalidJson(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid custom code: {0}")]
    InvalidShortCode(String),
    #[error("custom code already exists")]
    CodeTaken(String),
    #[error("not found")]
    NotFound,
    #[error("request timed out")]
    Timeout,
    #[error("internal error")]
    Panic,
    #[error("{public}")]
    Internal {
        public: &'static str,
        #[source]
        source: ShortenerError,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(_) | AppError::InvalidUrl(_) | AppError::InvalidShortCode(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::CodeTaken(_) => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal { .. } | AppError::Panic => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        match error {
            ShortenerError::CodeTaken(code) => AppError::CodeTaken(code),
            ShortenerError::NotFound(_) => AppError::NotFound,
            ShortenerError::InvalidShortCode(reason) => AppError::InvalidShortCode(reason),
            source @ ShortenerError::Storage(_) => AppError::Internal {
                public: "store error",
                source,
            },
            source @ (ShortenerError::Entropy(_) | ShortenerError::Exhausted { .. }) => {
                AppError::Internal {
                    public: "code generation failed",
                    source,
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Internal { source, .. } => {
                error!(error = %source, "request failed");
            }
            AppError::Panic => {
                error!("handler panicked");
            }
            AppError::Timeout => {
                warn!("request timed out");
            }
            AppError::InvalidJson(detail) => {
                tracing::debug!(detail = %detail, "rejected request body");
            }
            _ => {}
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
