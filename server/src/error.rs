//! The single error type handlers return, and its HTTP rendering.
//!
//! # Design
//! Handlers never build error responses themselves. Every failure converts
//! into `AppError` (mostly through `?`), and `IntoResponse` is the one place
//! that picks the status code and body. Server-side faults are logged with
//! their detail and rendered with a fixed message so internals never reach
//! the client.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todo_core::{FieldError, MalformedId, StoreError, ValidationError};

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum AppError {
    /// The body parsed as JSON but failed the todo schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The body was not JSON, or was sent without a JSON content type.
    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    /// The path segments could not be decoded, e.g. invalid UTF-8.
    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    MalformedId(#[from] MalformedId),

    /// No todo has this id. Holds the id as the client sent it.
    #[error("Todo with id \"{0}\" not found.")]
    NotFound(String),

    /// No route matched. Holds the requested path and query.
    #[error("Not Found - {0}")]
    RouteNotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedId(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::Query(rejection) => rejection.status(),
            Self::Path(rejection) => rejection.status(),
            Self::NotFound(_) | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Body(_) => "INVALID_BODY",
            Self::Query(_) => "INVALID_QUERY",
            Self::Path(_) => "INVALID_PATH",
            Self::MalformedId(_) => "MALFORMED_ID",
            Self::NotFound(_) | Self::RouteNotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed".to_string(),
            Self::Body(rejection) => rejection.body_text(),
            Self::Query(rejection) => rejection.body_text(),
            Self::Path(rejection) => rejection.body_text(),
            Self::Storage(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.message(),
            details: match self {
                Self::Validation(err) => Some(err.errors),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}
