//! Route handlers for the HTTP API.

pub mod health;
pub mod reviews;
pub mod transfer;
pub mod uploads;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;

use crate::error::AppError;

/// Read the `file` part of a multipart body, returning the client-side
/// file name (empty when not sent) and the contents.
pub(crate) async fn read_file_part(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(String, Bytes), AppError> {
    let mut multipart = multipart.map_err(|e| AppError::rejected("file", e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::rejected("file", e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::rejected("file", e.body_text()))?;
        return Ok((filename, data));
    }

    Err(AppError::rejected("file", "field required"))
}
