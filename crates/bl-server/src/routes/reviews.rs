//! Review CRUD route handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use bl_core::{Error, Review, ReviewCreate, ReviewId, ReviewUpdate};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::AppError;

/// Paging parameters for the review list.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReviewsParams {
    /// Number of reviews to skip.
    #[serde(default)]
    pub offset: u64,
    /// Maximum number of reviews to return (server default when omitted).
    pub limit: Option<u64>,
}

/// Body returned by a successful delete.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub ok: bool,
}

pub(crate) fn parse_review_id(raw: &str) -> Result<ReviewId, AppError> {
    raw.parse()
        .map_err(|_| Error::validation("id", format!("not a review id: {raw:?}")).into())
}

/// POST /reviews/
#[utoipa::path(
    post,
    path = "/reviews/",
    request_body = ReviewCreate,
    responses(
        (status = 200, description = "Review created", body = Review),
        (status = 422, description = "Invalid review")
    )
)]
pub async fn create_review(
    State(ctx): State<AppContext>,
    payload: Result<Json<ReviewCreate>, JsonRejection>,
) -> Result<Json<Review>, AppError> {
    let Json(input) = payload.map_err(|e| AppError::rejected("body", e.body_text()))?;
    let review = ctx.catalog.create(input)?;
    Ok(Json(review))
}

/// GET /reviews/
#[utoipa::path(
    get,
    path = "/reviews/",
    params(ListReviewsParams),
    responses(
        (status = 200, description = "A page of reviews ordered by id", body = Vec<Review>)
    )
)]
pub async fn list_reviews(
    State(ctx): State<AppContext>,
    params: Result<Query<ListReviewsParams>, QueryRejection>,
) -> Result<Json<Vec<Review>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::rejected("query", e.body_text()))?;
    let limit = params
        .limit
        .unwrap_or(u64::from(ctx.config.reviews.default_page_limit));
    let reviews = ctx.catalog.list(params.offset, limit)?;
    Ok(Json(reviews))
}

/// GET /reviews/{id}
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = Review),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Review>, AppError> {
    let id = parse_review_id(&id)?;
    Ok(Json(ctx.catalog.get(id)?))
}

/// PATCH /reviews/{id}
#[utoipa::path(
    patch,
    path = "/reviews/{id}",
    params(("id" = i64, Path, description = "Review ID")),
    request_body = ReviewUpdate,
    responses(
        (status = 200, description = "Updated review", body = Review),
        (status = 404, description = "Review not found"),
        (status = 422, description = "Invalid patch")
    )
)]
pub async fn update_review(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewUpdate>, JsonRejection>,
) -> Result<Json<Review>, AppError> {
    let id = parse_review_id(&id)?;
    let Json(patch) = payload.map_err(|e| AppError::rejected("body", e.body_text()))?;
    Ok(Json(ctx.catalog.update(id, patch)?))
}

/// DELETE /reviews/{id}
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = DeleteResponse),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_review_id(&id)?;
    ctx.catalog.delete(id)?;
    Ok(Json(DeleteResponse { ok: true }))
}
