//! Error-to-HTTP response conversion.
//!
//! Route handlers return `Result<T, AppError>`; any [`bl_core::Error`]
//! converts with `?`. Extractor rejections are folded into validation
//! errors so every failure reaches the client as the same JSON shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bl_core::Error;
use serde_json::json;

use crate::middleware::request_id::current_request_id;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: Error,
}

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self { inner }
    }

    /// A request part could not be extracted (bad JSON, query string, or
    /// multipart stream). Reported as a validation error against `field`.
    pub fn rejected(field: &str, reason: impl Into<String>) -> Self {
        Self::new(Error::validation(field, reason))
    }

    pub fn inner(&self) -> &Error {
        &self.inner
    }

    fn code(&self) -> &'static str {
        match &self.inner {
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::Database { .. } => "database_error",
            Error::Io { .. } => "io_error",
            Error::Media(_) => "media_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let mut body = json!({
            "error": self.inner.to_string(),
            "code": self.code(),
            "request_id": current_request_id(),
        });
        if let Error::Validation(details) = &self.inner {
            body["details"] = json!(details);
        }

        (status, axum::Json(body)).into_response()
    }
}
