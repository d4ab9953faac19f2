//! Dashboard statistics.
//!
//! The full statistics take a dozen aggregate queries, so the result is
//! cached for a minute. The activity feed is always read fresh.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use sqlx::PgPool;

use super::ServiceError;
use crate::db::{DashboardRepository, OrderRepository, ReviewRepository};
use crate::dto::dashboard::trailing_months;
use crate::dto::{DashboardStats, OrderStatusCounts, RecentActivity, ReportPeriods, SalesTrend};

const STATS_TTL: Duration = Duration::from_secs(60);
const STATS_KEY: &str = "dashboard";
const TREND_MONTHS: u32 = 6;
const TOP_PRODUCTS: i64 = 5;
const RECENT_ACTIVITY: i64 = 10;
/// Users who logged in within this many days count as active.
const ACTIVE_USER_DAYS: i64 = 30;

#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Everything the dashboard's cards and charts need.
    async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError>;

    /// The latest orders as feed entries, newest first.
    async fn recent_activity(&self) -> Result<Vec<RecentActivity>, ServiceError>;
}

/// [`DashboardService`] backed by `PostgreSQL`.
pub struct PgDashboardService {
    pool: PgPool,
    cache: Cache<&'static str, DashboardStats>,
}

impl PgDashboardService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(STATS_TTL)
                .build(),
        }
    }

    async fn compute_stats(&self) -> Result<DashboardStats, ServiceError> {
        let now = Utc::now();
        let periods = ReportPeriods::at(now);
        let dashboard = DashboardRepository::new(&self.pool);

        let totals = dashboard.entity_totals().await?;
        let revenue = dashboard.revenue(periods).await?;
        let (by_status, today) = dashboard.order_status_totals(periods.start_of_day).await?;
        let user_stats = dashboard
            .user_stats(periods, now - chrono::Duration::days(ACTIVE_USER_DAYS))
            .await?;
        let product_stats = dashboard.product_stats().await?;
        let sales_by_category = dashboard.sales_by_category().await?;
        let monthly = dashboard
            .monthly_revenue(&trailing_months(now.date_naive(), TREND_MONTHS))
            .await?;

        let top_products = OrderRepository::new(&self.pool)
            .top_selling(TOP_PRODUCTS)
            .await?;
        let customer_satisfaction = ReviewRepository::new(&self.pool)
            .average_approved_rating()
            .await?;

        let mut stats = DashboardStats {
            total_users: totals.users,
            total_products: totals.products,
            total_orders: totals.orders,
            total_categories: totals.categories,
            total_revenue: revenue.total,
            today_revenue: revenue.today,
            monthly_revenue: revenue.month,
            yearly_revenue: revenue.year,
            order_status_count: OrderStatusCounts::from_status_totals(&by_status, today),
            user_stats,
            product_stats,
            top_products,
            sales_by_category,
            sales_trends: Some(SalesTrend::from_monthly(&monthly)),
            conversion_rate: 0.0,
            customer_satisfaction,
        };
        stats.update_conversion_rate();

        Ok(stats)
    }
}

#[async_trait]
impl DashboardService for PgDashboardService {
    #[tracing::instrument(skip(self))]
    async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        if let Some(stats) = self.cache.get(&STATS_KEY).await {
            return Ok(stats);
        }

        let stats = self.compute_stats().await?;
        self.cache.insert(STATS_KEY, stats.clone()).await;
        tracing::debug!("dashboard stats recomputed");

        Ok(stats)
    }

    #[tracing::instrument(skip(self))]
    async fn recent_activity(&self) -> Result<Vec<RecentActivity>, ServiceError> {
        let orders = OrderRepository::new(&self.pool)
            .recent(RECENT_ACTIVITY)
            .await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                RecentActivity::order(order.id, order.status, order.total_amount, order.created_at)
            })
            .collect())
    }
}
