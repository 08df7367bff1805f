//! Bulk export/import of the whole catalog as a JSON array.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use bl_core::{Error, Review};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::read_file_part;

/// Result of a successful import.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub imported: usize,
}

/// GET /export
#[utoipa::path(
    get,
    path = "/export",
    responses(
        (status = 200, description = "Every review as a downloadable JSON array", body = Vec<Review>)
    )
)]
pub async fn export_reviews(
    State(ctx): State<AppContext>,
) -> Result<impl IntoResponse, AppError> {
    let reviews = ctx.catalog.export()?;
    tracing::info!(count = reviews.len(), "Exported reviews");
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"reviews.json\"",
        )],
        Json(reviews),
    ))
}

/// POST /import
#[utoipa::path(
    post,
    path = "/import",
    request_body(content_type = "multipart/form-data", description = "`file`: a JSON array of reviews"),
    responses(
        (status = 200, description = "All records imported", body = ImportResponse),
        (status = 422, description = "Malformed file or invalid record; nothing imported")
    )
)]
pub async fn import_reviews(
    State(ctx): State<AppContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    let (_, data) = read_file_part(multipart).await?;

    let records = match serde_json::from_slice::<serde_json::Value>(&data) {
        Ok(serde_json::Value::Array(records)) => records,
        Ok(_) => return Err(Error::validation("file", "expected a JSON array").into()),
        Err(e) => return Err(Error::validation("file", format!("invalid JSON: {e}")).into()),
    };

    let imported = ctx.catalog.import(records)?;
    Ok(Json(ImportResponse {
        message: format!("Successfully imported {imported} reviews"),
        imported,
    }))
}
