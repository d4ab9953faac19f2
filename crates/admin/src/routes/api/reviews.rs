//! Review moderation API handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch},
};
use bacoge_core::ReviewId;
use chrono::Utc;
use tracing::instrument;

use crate::{
    db::{RepositoryError, ReviewRepository},
    dto::{ReportPeriods, ReviewStatsDto, UpdateReviewStatusRequest},
    error::AppError,
    extract::{ApiJson, ApiPath},
    middleware::auth::RequireAdminAuth,
    models::Review,
    state::AppState,
};

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/reviews/stats", get(review_stats))
        .route("/admin/api/reviews/{id}/status", patch(update_review_status))
}

/// GET /admin/api/reviews/stats
async fn review_stats(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ReviewStatsDto>, AppError> {
    let stats = ReviewRepository::new(state.pool())
        .stats(ReportPeriods::at(Utc::now()))
        .await?;
    Ok(Json(stats))
}

/// Approve or reject a review.
///
/// PATCH /admin/api/reviews/{id}/status
#[instrument(skip(admin, state), fields(admin = %admin.email))]
async fn update_review_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReviewId>,
    ApiJson(request): ApiJson<UpdateReviewStatusRequest>,
) -> Result<Json<Review>, AppError> {
    let review = ReviewRepository::new(state.pool())
        .update_status(id, request.status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("Review {id} not found")),
            other => other.into(),
        })?;

    tracing::info!(review_id = %id, status = ?review.status, "review moderated");
    Ok(Json(review))
}
