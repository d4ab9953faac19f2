//! Promotion repository.

use bacoge_core::{DiscountType, PromotionId, PromotionStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::config::Pagination;
use crate::dto::stats::{PromotionStatsDto, ReportPeriods};
use crate::models::Promotion;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: PromotionId,
    name: String,
    description: Option<String>,
    discount_type: DiscountType,
    discount_percentage: Option<Decimal>,
    discount_amount: Option<Decimal>,
    promo_code: Option<String>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    min_order_amount: Option<Decimal>,
    max_uses: Option<i32>,
    current_uses: i32,
    status: PromotionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PromotionRow> for Promotion {
    fn from(row: PromotionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            discount_type: row.discount_type,
            discount_percentage: row.discount_percentage,
            discount_amount: row.discount_amount,
            promo_code: row.promo_code,
            start_date: row.start_date,
            end_date: row.end_date,
            min_order_amount: row.min_order_amount,
            max_uses: row.max_uses,
            current_uses: row.current_uses,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for promotions.
pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of promotions, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        pagination: Pagination,
        status: Option<PromotionStatus>,
    ) -> Result<(Vec<Promotion>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, PromotionRow>(
            r#"
            SELECT id, name, description, discount_type, discount_percentage, discount_amount,
                   promo_code, start_date, end_date, min_order_amount, max_uses, current_uses,
                   status, created_at, updated_at
            FROM promotions
            WHERE ($1::promotion_status IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM promotions WHERE ($1::promotion_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok((rows.into_iter().map(Promotion::from).collect(), total))
    }

    /// Every promotion with the given status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_status(
        &self,
        status: PromotionStatus,
    ) -> Result<Vec<Promotion>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromotionRow>(
            r#"
            SELECT id, name, description, discount_type, discount_percentage, discount_amount,
                   promo_code, start_date, end_date, min_order_amount, max_uses, current_uses,
                   status, created_at, updated_at
            FROM promotions
            WHERE status = $1
            ORDER BY start_date
            "#,
        )
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Promotion::from).collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM promotions")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Promotions whose end date is before `now`, whatever their status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_expired(&self, now: DateTime<Utc>) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM promotions WHERE end_date < $1")
            .bind(now)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Counters for the promotion report.
    ///
    /// `active` counts only promotions that are currently applicable, which
    /// needs the full validity rules, so those rows are loaded and checked
    /// in process.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(
        &self,
        periods: ReportPeriods,
    ) -> Result<PromotionStatsDto, RepositoryError> {
        let (total, inactive, expired, today, this_week, this_month): (
            i64,
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'INACTIVE'),
                   COUNT(*) FILTER (WHERE end_date < $1),
                   COUNT(*) FILTER (WHERE created_at >= $2),
                   COUNT(*) FILTER (WHERE created_at >= $3),
                   COUNT(*) FILTER (WHERE created_at >= $4)
            FROM promotions
            "#,
        )
        .bind(periods.now)
        .bind(periods.start_of_day)
        .bind(periods.start_of_week)
        .bind(periods.start_of_month)
        .fetch_one(self.pool)
        .await?;

        let active = self
            .list_by_status(PromotionStatus::Active)
            .await?
            .iter()
            .filter(|promotion| promotion.is_valid(periods.now))
            .count();

        Ok(PromotionStatsDto {
            total_promotions: total,
            active_promotions: i64::try_from(active).unwrap_or(i64::MAX),
            inactive_promotions: inactive,
            expired_promotions: expired,
            new_today: today,
            new_this_week: this_week,
            new_this_month: this_month,
            last_updated: periods.now,
        })
    }
}
