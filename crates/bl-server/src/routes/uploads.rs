//! Image upload.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use bl_core::Error;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::read_file_part;

/// Where an upload was stored.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Stored file name.
    pub filename: String,
    /// URL to store in a review's `image_url`.
    pub url: String,
    /// Present only when a thumbnail could be generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// POST /upload/
#[utoipa::path(
    post,
    path = "/upload/",
    request_body(content_type = "multipart/form-data", description = "`file`: the image"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 422, description = "No file part")
    )
)]
pub async fn upload_image(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, data) = read_file_part(multipart).await?;

    let media = ctx.media.clone();
    let stored = tokio::task::spawn_blocking(move || media.accept(&filename, &data))
        .await
        .map_err(|e| Error::Internal(format!("Upload task failed: {e}")))??;

    Ok(Json(UploadResponse {
        filename: stored.filename,
        url: stored.reference_url,
        thumbnail_url: stored.thumbnail_url,
    }))
}
