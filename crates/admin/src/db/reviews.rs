//! Product review repository.

use bacoge_core::{ProductId, ReviewId, ReviewStatus, UserId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RepositoryError;
use crate::dto::stats::{ReportPeriods, ReviewStatsDto};
use crate::models::Review;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    product_id: ProductId,
    user_id: UserId,
    rating: i32,
    title: Option<String>,
    comment: Option<String>,
    is_verified_purchase: bool,
    status: ReviewStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            rating: row.rating,
            title: row.title,
            comment: row.comment,
            is_verified_purchase: row.is_verified_purchase,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row of the review report query.
#[derive(Debug, sqlx::FromRow)]
struct ReviewCountsRow {
    total: i64,
    approved: i64,
    pending: i64,
    rejected: i64,
    average_rating: Option<f64>,
    new_today: i64,
    new_this_week: i64,
    new_this_month: i64,
}

pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Counters for the review report. The average covers every review
    /// regardless of moderation state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self, periods: ReportPeriods) -> Result<ReviewStatsDto, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewCountsRow>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'APPROVED') AS approved,
                   COUNT(*) FILTER (WHERE status = 'PENDING') AS pending,
                   COUNT(*) FILTER (WHERE status = 'REJECTED') AS rejected,
                   AVG(rating)::DOUBLE PRECISION AS average_rating,
                   COUNT(*) FILTER (WHERE created_at >= $1) AS new_today,
                   COUNT(*) FILTER (WHERE created_at >= $2) AS new_this_week,
                   COUNT(*) FILTER (WHERE created_at >= $3) AS new_this_month
            FROM product_reviews
            "#,
        )
        .bind(periods.start_of_day)
        .bind(periods.start_of_week)
        .bind(periods.start_of_month)
        .fetch_one(self.pool)
        .await?;

        Ok(ReviewStatsDto {
            total_reviews: row.total,
            approved_reviews: row.approved,
            pending_reviews: row.pending,
            rejected_reviews: row.rejected,
            average_rating: row.average_rating.unwrap_or(0.0),
            new_today: row.new_today,
            new_this_week: row.new_this_week,
            new_this_month: row.new_this_month,
            last_updated: periods.now,
        })
    }

    /// Moderate a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn update_status(
        &self,
        id: ReviewId,
        status: ReviewStatus,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            UPDATE product_reviews
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, product_id, user_id, rating, title, comment,
                      is_verified_purchase, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Mean rating of approved reviews, `0` when there are none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn average_approved_rating(&self) -> Result<f64, RepositoryError> {
        let average: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(rating)::DOUBLE PRECISION FROM product_reviews WHERE status = 'APPROVED'",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(average.unwrap_or(0.0))
    }
}
