//! Promotion API handlers.

use axum::{Json, Router, extract::State, routing::get};
use bacoge_core::PromotionStatus;
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    config::PageRequest,
    db::PromotionRepository,
    dto::{Page, PromotionStatsDto, ReportPeriods},
    error::AppError,
    extract::ApiQuery,
    middleware::auth::RequireAdminAuth,
    models::Promotion,
    state::AppState,
};

/// `?page=&size=&status=`
#[derive(Debug, Default, Deserialize)]
struct PromotionListQuery {
    page: Option<u32>,
    size: Option<u32>,
    status: Option<PromotionStatus>,
}

/// Build the promotions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/promotions", get(list_promotions))
        .route("/admin/api/promotions/stats", get(promotion_stats))
}

/// GET /admin/api/promotions
#[instrument(skip(_admin, state))]
async fn list_promotions(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PromotionListQuery>,
) -> Result<Json<Page<Promotion>>, AppError> {
    let pagination = state.config().pagination.resolve(PageRequest {
        page: query.page,
        size: query.size,
    });
    let (promotions, total) = PromotionRepository::new(state.pool())
        .list(pagination, query.status)
        .await?;

    Ok(Json(Page::new(promotions, pagination, total)))
}

/// GET /admin/api/promotions/stats
async fn promotion_stats(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<PromotionStatsDto>, AppError> {
    let stats = PromotionRepository::new(state.pool())
        .stats(ReportPeriods::at(Utc::now()))
        .await?;
    Ok(Json(stats))
}
