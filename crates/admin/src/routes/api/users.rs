//! User API handlers.

use axum::{Json, Router, extract::State, routing::get};
use bacoge_core::UserId;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    config::PageRequest,
    db::UserRepository,
    dto::{Page, UserDto, UserReportDto},
    error::AppError,
    extract::{ApiPath, ApiQuery},
    middleware::auth::RequireAdminAuth,
    state::AppState,
};

/// `?start=&end=` as RFC 3339 instants.
#[derive(Debug, Deserialize)]
struct ReportQuery {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/api/users", get(list_users))
        .route("/admin/api/users/report", get(user_report))
        .route("/admin/api/users/{id}", get(get_user))
}

/// GET /admin/api/users
#[instrument(skip(_admin, state))]
async fn list_users(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(request): ApiQuery<PageRequest>,
) -> Result<Json<Page<UserDto>>, AppError> {
    let pagination = state.config().pagination.resolve(request);
    let (users, total) = UserRepository::new(state.pool()).list(pagination).await?;

    Ok(Json(Page::new(users, pagination, total).map(UserDto::from)))
}

/// GET /admin/api/users/{id}
async fn get_user(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<UserDto>, AppError> {
    UserRepository::new(state.pool())
        .get(id)
        .await?
        .map(|user| Json(UserDto::from(user)))
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
}

/// Registrations and activity between two instants.
///
/// GET /admin/api/users/report?start=&end=
#[instrument(skip(_admin, state))]
async fn user_report(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Json<UserReportDto>, AppError> {
    if query.end < query.start {
        return Err(AppError::IllegalArgument(
            "end must not be before start".to_string(),
        ));
    }

    let (total, new_users, active, registrations) = UserRepository::new(state.pool())
        .report_counts(query.start, query.end)
        .await?;

    Ok(Json(UserReportDto::new(
        query.start,
        query.end,
        total,
        new_users,
        active,
        registrations,
    )))
}
