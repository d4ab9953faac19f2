//! Category repository.
//!
//! Categories are always read together with the number of products that
//! reference them.

use bacoge_core::{CategoryId, CategoryStatus};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RepositoryError;
use crate::config::Pagination;
use crate::models::{Category, CategoryDraft};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    icon: String,
    status: CategoryStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_count: i64,
}

impl From<CategoryRow> for (Category, i64) {
    fn from(row: CategoryRow) -> Self {
        let category = Category {
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            icon: row.icon,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        (category, row.product_count)
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product categories.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of categories ordered by name, each with its product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        pagination: Pagination,
    ) -> Result<(Vec<(Category, i64)>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT c.id, c.name, c.description, c.image_url, c.icon, c.status,
                   c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count
            FROM categories c
            ORDER BY c.name, c.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let total = self.count().await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<(Category, i64)>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT c.id, c.name, c.description, c.image_url, c.icon, c.status,
                   c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count
            FROM categories c
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a category. New categories have no products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    pub async fn insert(&self, draft: &CategoryDraft) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name, description, image_url, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, image_url, icon, status,
                      created_at, updated_at, 0::BIGINT AS product_count
            "#,
        )
        .bind(&draft.name)
        .bind(draft.description.as_deref())
        .bind(draft.image_url.as_deref())
        .bind(draft.status)
        .fetch_one(self.pool)
        .await?;

        let (category, _) = row.into();
        Ok(category)
    }

    /// Replace a category's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is already taken.
    pub async fn update(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<(Category, i64), RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = $2, description = $3, image_url = $4, status = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, image_url, icon, status, created_at, updated_at,
                      (SELECT COUNT(*) FROM products p WHERE p.category_id = $1) AS product_count
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.description.as_deref())
        .bind(draft.image_url.as_deref())
        .bind(draft.status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Point a category at a newly uploaded image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn set_image_url(
        &self,
        id: CategoryId,
        image_url: &str,
    ) -> Result<(Category, i64), RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET image_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, image_url, icon, status, created_at, updated_at,
                      (SELECT COUNT(*) FROM products p WHERE p.category_id = $1) AS product_count
            "#,
        )
        .bind(id)
        .bind(image_url)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a category. Its products keep existing without one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing was deleted.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
