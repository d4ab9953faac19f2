//! Aggregate queries behind the dashboard.
//!
//! Revenue only counts orders that are confirmed, shipped or delivered.

use std::collections::HashMap;

use bacoge_core::OrderStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::dto::dashboard::LOW_STOCK_THRESHOLD;
use crate::dto::stats::ReportPeriods;
use crate::dto::{CategorySales, ProductStats, UserStats};

/// Row counts of the main tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct EntityTotals {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub categories: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct Revenue {
    pub total: Decimal,
    pub today: Decimal,
    pub month: Decimal,
    pub year: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct StatusCountRow {
    status: OrderStatus,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct MonthRow {
    month: NaiveDate,
    amount: Decimal,
}

pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn entity_totals(&self) -> Result<EntityTotals, RepositoryError> {
        let totals = sqlx::query_as::<_, EntityTotals>(
            r#"
            SELECT (SELECT COUNT(*) FROM users) AS users,
                   (SELECT COUNT(*) FROM products) AS products,
                   (SELECT COUNT(*) FROM orders) AS orders,
                   (SELECT COUNT(*) FROM categories) AS categories
            "#,
        )
        .fetch_one(self.pool)
        .await?;
        Ok(totals)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue(&self, periods: ReportPeriods) -> Result<Revenue, RepositoryError> {
        let revenue = sqlx::query_as::<_, Revenue>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0) AS total,
                   COALESCE(SUM(total_amount) FILTER (WHERE created_at >= $1), 0) AS today,
                   COALESCE(SUM(total_amount) FILTER (WHERE created_at >= $2), 0) AS month,
                   COALESCE(SUM(total_amount) FILTER (WHERE created_at >= $3), 0) AS year
            FROM orders
            WHERE status IN ('CONFIRMED', 'SHIPPED', 'DELIVERED')
            "#,
        )
        .bind(periods.start_of_day)
        .bind(periods.start_of_month)
        .bind(periods.start_of_year)
        .fetch_one(self.pool)
        .await?;
        Ok(revenue)
    }

    /// Order totals per status, plus orders placed since `start_of_day`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn order_status_totals(
        &self,
        start_of_day: DateTime<Utc>,
    ) -> Result<(HashMap<OrderStatus, i64>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status, COUNT(*) AS count FROM orders GROUP BY status",
        )
        .fetch_all(self.pool)
        .await?;

        let today: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE created_at >= $1")
            .bind(start_of_day)
            .fetch_one(self.pool)
            .await?;

        let by_status = rows.into_iter().map(|row| (row.status, row.count)).collect();
        Ok((by_status, today))
    }

    /// New users today and this month, and users seen since `active_since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn user_stats(
        &self,
        periods: ReportPeriods,
        active_since: DateTime<Utc>,
    ) -> Result<UserStats, RepositoryError> {
        let (new_today, new_this_month, active): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE created_at >= $1),
                   COUNT(*) FILTER (WHERE created_at >= $2),
                   COUNT(*) FILTER (WHERE last_login >= $3)
            FROM users
            "#,
        )
        .bind(periods.start_of_day)
        .bind(periods.start_of_month)
        .bind(active_since)
        .fetch_one(self.pool)
        .await?;

        Ok(UserStats {
            new_today,
            new_this_month,
            active,
        })
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_stats(&self) -> Result<ProductStats, RepositoryError> {
        let (total, active, out_of_stock, low_stock): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'ACTIVE'),
                   COUNT(*) FILTER (WHERE stock_quantity = 0),
                   COUNT(*) FILTER (WHERE stock_quantity <= $1)
            FROM products
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(self.pool)
        .await?;

        Ok(ProductStats {
            total,
            active,
            out_of_stock,
            low_stock,
        })
    }

    /// Revenue per category, largest first. Uncategorised products are
    /// grouped under "Sans catégorie".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_by_category(&self) -> Result<Vec<CategorySales>, RepositoryError> {
        let rows: Vec<(String, Decimal)> = sqlx::query_as(
            r#"
            SELECT COALESCE(c.name, 'Sans catégorie') AS category,
                   SUM(oi.total_price) AS amount
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE o.status IN ('CONFIRMED', 'SHIPPED', 'DELIVERED')
            GROUP BY COALESCE(c.name, 'Sans catégorie')
            ORDER BY amount DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, amount)| CategorySales { category, amount })
            .collect())
    }

    /// Revenue for each month in `months` (first days, oldest first).
    /// Months without sales report zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_revenue(
        &self,
        months: &[NaiveDate],
    ) -> Result<Vec<(NaiveDate, Decimal)>, RepositoryError> {
        let Some(first) = months.first() else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, MonthRow>(
            r#"
            SELECT date_trunc('month', created_at AT TIME ZONE 'UTC')::DATE AS month,
                   SUM(total_amount) AS amount
            FROM orders
            WHERE status IN ('CONFIRMED', 'SHIPPED', 'DELIVERED')
              AND created_at >= ($1::DATE AT TIME ZONE 'UTC')
            GROUP BY month
            "#,
        )
        .bind(*first)
        .fetch_all(self.pool)
        .await?;

        let by_month: HashMap<NaiveDate, Decimal> =
            rows.into_iter().map(|row| (row.month, row.amount)).collect();

        Ok(months
            .iter()
            .map(|month| (*month, by_month.get(month).copied().unwrap_or_default()))
            .collect())
    }
}
