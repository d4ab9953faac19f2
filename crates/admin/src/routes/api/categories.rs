//! Category API handlers.

use std::path::Path;

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    routing::{get, post},
};
use bacoge_core::CategoryId;
use chrono::Utc;
use tracing::instrument;

use crate::{
    config::PageRequest,
    db::CategoryRepository,
    dto::{CategoryDto, CreateCategoryRequest, Page},
    error::AppError,
    extract::{ApiPath, ApiQuery, ValidatedJson},
    middleware::auth::RequireAdminAuth,
    state::AppState,
};

/// Image types accepted for category pictures.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Public URL prefix the upload directory is served under.
pub const UPLOADS_URL: &str = "/uploads";

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/api/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/admin/api/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/admin/api/categories/{id}/image", post(upload_image))
}

fn not_found() -> AppError {
    AppError::NotFound("Category not found".to_string())
}

/// GET /admin/api/categories
#[instrument(skip(_admin, state))]
async fn list_categories(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiQuery(request): ApiQuery<PageRequest>,
) -> Result<Json<Page<CategoryDto>>, AppError> {
    let pagination = state.config().pagination.resolve(request);
    let (categories, total) = CategoryRepository::new(state.pool())
        .list(pagination)
        .await?;

    let content = categories
        .into_iter()
        .map(|(category, products)| CategoryDto::new(category, products))
        .collect();
    Ok(Json(Page::new(content, pagination, total)))
}

/// POST /admin/api/categories
#[instrument(skip(_admin, state, request))]
async fn create_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryDto>), AppError> {
    let draft = request.into_draft();
    let category = CategoryRepository::new(state.pool()).insert(&draft).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "category created");

    Ok((StatusCode::CREATED, Json(CategoryDto::new(category, 0))))
}

/// GET /admin/api/categories/{id}
async fn get_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<Json<CategoryDto>, AppError> {
    let (category, products) = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(CategoryDto::new(category, products)))
}

/// PUT /admin/api/categories/{id}
#[instrument(skip(_admin, state, request))]
async fn update_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<Json<CategoryDto>, AppError> {
    let draft = request.into_draft();
    let (category, products) = CategoryRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => not_found(),
            other => other.into(),
        })?;

    Ok(Json(CategoryDto::new(category, products)))
}

/// DELETE /admin/api/categories/{id}
#[instrument(skip(_admin, state))]
async fn delete_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> Result<StatusCode, AppError> {
    CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => not_found(),
            other => other.into(),
        })?;

    tracing::info!(category_id = %id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Lower-cased extension of an uploaded file name, if it is an accepted
/// image type.
fn image_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Write `bytes` to `path`, then run `persist`. The file is removed again
/// when `persist` fails.
async fn store_upload<T, E>(
    path: &Path,
    bytes: &[u8],
    persist: impl Future<Output = Result<T, E>>,
) -> Result<T, AppError>
where
    AppError: From<E>,
{
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| AppError::Internal(format!("cannot store upload: {e}")))?;

    match persist.await {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Err(remove) = tokio::fs::remove_file(path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %remove,
                    "cannot remove orphaned upload"
                );
            }
            Err(e.into())
        }
    }
}

/// Store a category picture and point the category at it.
///
/// POST /admin/api/categories/{id}/image (multipart field `file`)
#[instrument(skip(_admin, state, multipart))]
async fn upload_image(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CategoryDto>, AppError> {
    let mut multipart = multipart?;
    let repo = CategoryRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(not_found());
    }

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let ext = image_extension(&file_name).ok_or_else(|| {
            AppError::IllegalArgument(format!("Unsupported image type: {file_name}"))
        })?;
        let bytes = field.bytes().await?;
        upload = Some((ext, bytes));
        break;
    }

    let (ext, bytes) = upload.ok_or_else(|| {
        AppError::Multipart("Required part 'file' is not present".to_string())
    })?;
    if bytes.is_empty() {
        return Err(AppError::IllegalArgument("Uploaded file is empty".to_string()));
    }

    let dir = state.config().upload_dir.join("categories");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("cannot create upload directory: {e}")))?;

    let stored_name = format!("category-{id}-{}.{ext}", Utc::now().timestamp_millis());
    let image_url = format!("{UPLOADS_URL}/categories/{stored_name}");
    let (category, products) = store_upload(
        &dir.join(&stored_name),
        &bytes,
        repo.set_image_url(id, &image_url),
    )
    .await?;
    tracing::info!(category_id = %id, %image_url, size = bytes.len(), "category image stored");

    Ok(Json(CategoryDto::new(category, products)))
}
