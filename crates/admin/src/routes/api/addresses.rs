//! Address API handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use bacoge_core::{AddressId, UserId};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    config::PageRequest,
    db::{AddressRepository, RepositoryError},
    dto::{AddressStatsDto, CreateAddressRequest, Page, ReportPeriods, UpdateAddressRequest},
    error::AppError,
    extract::{ApiPath, ApiQuery, ValidatedJson},
    middleware::auth::RequireAdminAuth,
    models::Address,
    state::AppState,
};

/// `?page=&size=&userId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressListQuery {
    page: Option<u32>,
    size: Option<u32>,
    user_id: Option<UserId>,
}

/// Build the addresses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/api/addresses",
            get(list_addresses).post(create_address),
        )
        .route("/admin/api/addresses/stats", get(address_stats))
        .route(
            "/admin/api/addresses/{id}",
            get(get_address).put(update_address).delete(delete_address),
        )
}

fn not_found(id: AddressId) -> AppError {
    AppError::NotFound(format!("Address {id} not found"))
}

/// GET /admin/api/addresses
#[instrument(skip(_admin, state))]
async fn list_addresses(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AddressListQuery>,
) -> Result<Json<Page<Address>>, AppError> {
    let pagination = state.config().pagination.resolve(PageRequest {
        page: query.page,
        size: query.size,
    });
    let (addresses, total) = AddressRepository::new(state.pool())
        .list(pagination, query.user_id)
        .await?;

    Ok(Json(Page::new(addresses, pagination, total)))
}

/// POST /admin/api/addresses
#[instrument(skip(_admin, state, request))]
async fn create_address(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateAddressRequest>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let address = AddressRepository::new(state.pool())
        .insert(request.into_address())
        .await?;

    if let Some(id) = address.id {
        tracing::info!(address_id = %id, user_id = %address.user_id, "address created");
    }
    Ok((StatusCode::CREATED, Json(address)))
}

/// GET /admin/api/addresses/{id}
async fn get_address(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AddressId>,
) -> Result<Json<Address>, AppError> {
    AddressRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Apply a partial update. Label fields keep mirroring each other.
///
/// PUT /admin/api/addresses/{id}
#[instrument(skip(_admin, state, request))]
async fn update_address(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AddressId>,
    ValidatedJson(request): ValidatedJson<UpdateAddressRequest>,
) -> Result<Json<Address>, AppError> {
    let repo = AddressRepository::new(state.pool());
    let mut address = repo.get(id).await?.ok_or_else(|| not_found(id))?;
    request.apply(&mut address);

    let address = repo.update(address).await.map_err(|e| match e {
        RepositoryError::NotFound => not_found(id),
        other => other.into(),
    })?;
    Ok(Json(address))
}

/// DELETE /admin/api/addresses/{id}
#[instrument(skip(_admin, state))]
async fn delete_address(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AddressId>,
) -> Result<StatusCode, AppError> {
    AddressRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => other.into(),
        })?;

    tracing::info!(address_id = %id, "address deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/api/addresses/stats
async fn address_stats(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<AddressStatsDto>, AppError> {
    let stats = AddressRepository::new(state.pool())
        .stats(ReportPeriods::at(Utc::now()))
        .await?;
    Ok(Json(stats))
}
