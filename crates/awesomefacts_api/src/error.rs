//! HTTP error mapping.
//!
//! # Invariants
//! - Storage fault details are logged, never echoed to the client.
//! - Every error body has the shape `{ "error": <code>, "message": <text> }`.

use awesomefacts_core::{FactId, FactValidationError, RepoError};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    NotFound(FactId),
    Validation(FactValidationError),
    /// Body or path could not be extracted; keeps the extractor's status.
    Rejected { status: StatusCode, message: String },
    Storage(RepoError),
    /// The blocking storage task panicked or the service lock was poisoned.
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_failed",
            Self::Rejected { .. } => "invalid_request",
            Self::Storage(_) => "storage_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "fact {id} not found"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Rejected { message, .. } => f.write_str(message),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Internal(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl From<FactValidationError> for ApiError {
    fn from(value: FactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Rejected {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::Rejected {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Storage(err) => {
                error!(
                    "event=http_error module=api status=error error_code={} error={}",
                    self.code(),
                    err
                );
                "storage backend failure".to_string()
            }
            Self::Internal(details) => {
                error!(
                    "event=http_error module=api status=error error_code={} error={}",
                    self.code(),
                    details
                );
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
