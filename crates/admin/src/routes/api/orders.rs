//! Order reporting API handlers.

use axum::{Json, Router, extract::State, routing::get};
use bacoge_core::OrderId;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    db::OrderRepository,
    dto::{OrderChartDto, OrderItemDto, TopSellingProductDto},
    error::AppError,
    extract::{ApiPath, ApiQuery},
    middleware::auth::RequireAdminAuth,
    state::AppState,
};

const DEFAULT_CHART_DAYS: u32 = 30;
const MAX_CHART_DAYS: u32 = 365;
const DEFAULT_TOP_SELLING: u32 = 10;
const MAX_TOP_SELLING: u32 = 50;

#[derive(Debug, Default, Deserialize)]
struct ChartQuery {
    days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct TopSellingQuery {
    limit: Option<u32>,
}

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/orders/chart", get(order_chart))
        .route("/admin/api/orders/{id}/items", get(order_items))
        .route("/admin/api/products/top-selling", get(top_selling))
}

/// Resolve the chart window, rejecting anything outside one day to a year.
fn chart_days(requested: Option<u32>) -> Result<u32, AppError> {
    let days = requested.unwrap_or(DEFAULT_CHART_DAYS);
    if (1..=MAX_CHART_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(AppError::constraint(
            "days",
            format!("must be between 1 and {MAX_CHART_DAYS}"),
        ))
    }
}

fn top_selling_limit(requested: Option<u32>) -> u32 {
    match requested {
        None | Some(0) => DEFAULT_TOP_SELLING,
        Some(n) => n.min(MAX_TOP_SELLING),
    }
}

/// GET /admin/api/orders/{id}/items
async fn order_items(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<Vec<OrderItemDto>>, AppError> {
    let repo = OrderRepository::new(state.pool());
    if !repo.exists(id).await? {
        return Err(AppError::NotFound(format!("Order {id} not found")));
    }

    let items = repo.items(id).await?;
    Ok(Json(items.into_iter().map(OrderItemDto::from).collect()))
}

/// GET /admin/api/orders/chart?days=
#[instrument(skip(_admin, state))]
async fn order_chart(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ChartQuery>,
) -> Result<Json<Vec<OrderChartDto>>, AppError> {
    let days = chart_days(query.days)?;
    let since = Utc::now() - Duration::days(i64::from(days));

    let points = OrderRepository::new(state.pool()).chart(since).await?;
    Ok(Json(points))
}

/// GET /admin/api/products/top-selling?limit=
async fn top_selling(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TopSellingQuery>,
) -> Result<Json<Vec<TopSellingProductDto>>, AppError> {
    let limit = top_selling_limit(query.limit);
    let products = OrderRepository::new(state.pool())
        .top_selling(i64::from(limit))
        .await?;
    Ok(Json(products))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_chart_days() {
        assert!(matches!(chart_days(None), Ok(30)));
        assert!(matches!(chart_days(Some(365)), Ok(365)));

        let err = chart_days(Some(0)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, AppError::ConstraintViolation(ref d) if d.contains_key("days")));
        assert!(chart_days(Some(366)).is_err());
    }

    #[test]
    fn test_top_selling_limit() {
        assert_eq!(top_selling_limit(None), 10);
        assert_eq!(top_selling_limit(Some(0)), 10);
        assert_eq!(top_selling_limit(Some(5)), 5);
        assert_eq!(top_selling_limit(Some(500)), 50);
    }
}
