//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"detail": "..."}` with a status derived
//! from the core error kind.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookstore_core::{AuthorServiceError, BookServiceError, FilterError};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// API-level error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client data violates a catalog invariant or cannot be parsed.
    #[error("{0}")]
    Validation(String),

    /// Lookup missed.
    #[error("{0}")]
    NotFound(String),

    /// Store or consistency failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                "event=http_error module=api status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        }
        let body = Json(ErrorBody {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<BookServiceError> for ApiError {
    fn from(value: BookServiceError) -> Self {
        match value {
            BookServiceError::Validation(message) => Self::Validation(message),
            BookServiceError::BookNotFound(_) => Self::NotFound("Not found.".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AuthorServiceError> for ApiError {
    fn from(value: AuthorServiceError) -> Self {
        match value {
            AuthorServiceError::NotFound(_) => Self::NotFound("Not found.".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(value: FilterError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Validation(value.body_text())
    }
}
