//! Translation of [`Error`] into HTTP responses.
//!
//! This is the only place that knows which status code belongs to which error.

use crate::errors::Error;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error text
    pub message: String,
}

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Io(_) | Self::Config { .. } | Self::PasswordHash { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        let body = Json(ErrorResponse {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejections are reported as [`Error::Validation`]
/// with the usual `{"message"}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub struct ValidJson<T>(pub T);

/// `Path` extractor reporting malformed segments as [`Error::Validation`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(Error))]
pub struct ValidPath<T>(pub T);

/// `Query` extractor reporting malformed query strings as [`Error::Validation`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(Error))]
pub struct ValidQuery<T>(pub T);
