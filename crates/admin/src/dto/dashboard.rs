//! Dashboard aggregates.

use std::collections::HashMap;

use bacoge_core::{OrderId, OrderStatus};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::TopSellingProductDto;

/// Everything shown in the dashboard's stat cards and charts.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_categories: i64,

    pub total_revenue: Decimal,
    pub today_revenue: Decimal,
    pub monthly_revenue: Decimal,
    pub yearly_revenue: Decimal,

    pub order_status_count: OrderStatusCounts,
    pub user_stats: UserStats,
    pub product_stats: ProductStats,

    pub top_products: Vec<TopSellingProductDto>,
    pub sales_by_category: Vec<CategorySales>,
    pub sales_trends: Option<SalesTrend>,

    /// Completed orders per active user, as a percentage.
    pub conversion_rate: f64,
    /// Average approved review rating, 0 when there are none.
    pub customer_satisfaction: f64,
}

impl DashboardStats {
    /// Recompute `conversion_rate` from the order and user counters.
    #[allow(clippy::cast_precision_loss)]
    pub fn update_conversion_rate(&mut self) {
        let completed = self.order_status_count.completed;
        let active = self.user_stats.active;
        self.conversion_rate = if completed > 0 && active > 0 {
            completed as f64 / active as f64 * 100.0
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusCounts {
    pub total: i64,
    /// Not yet shipped: pending, confirmed and processing.
    pub pending: i64,
    pub confirmed: i64,
    pub processing: i64,
    pub shipped: i64,
    pub delivered: i64,
    pub cancelled: i64,
    /// Shipped or delivered.
    pub completed: i64,
    /// Placed since midnight.
    pub today: i64,
}

impl OrderStatusCounts {
    /// Derive the counters from per-status totals.
    #[must_use]
    pub fn from_status_totals(by_status: &HashMap<OrderStatus, i64>, today: i64) -> Self {
        let count = |status| by_status.get(&status).copied().unwrap_or(0);
        let pending = count(OrderStatus::Pending);
        let confirmed = count(OrderStatus::Confirmed);
        let processing = count(OrderStatus::Processing);
        let shipped = count(OrderStatus::Shipped);
        let delivered = count(OrderStatus::Delivered);
        let cancelled = count(OrderStatus::Cancelled);

        Self {
            total: by_status.values().sum(),
            pending: pending + confirmed + processing,
            confirmed,
            processing,
            shipped,
            delivered,
            cancelled,
            completed: delivered + shipped,
            today,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub new_today: i64,
    pub new_this_month: i64,
    /// Logged in during the last 30 days.
    pub active: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: i64,
    pub active: i64,
    pub out_of_stock: i64,
    /// Stock at or below [`LOW_STOCK_THRESHOLD`].
    pub low_stock: i64,
}

/// Products with this many units or fewer count as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

/// Monthly revenue series with month-over-month growth.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrend {
    pub labels: Vec<String>,
    pub sales: Vec<Decimal>,
    /// Growth of the last month over the previous one, in percent.
    pub trend: Option<f64>,
    pub trend_direction: Option<TrendDirection>,
}

const FRENCH_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

impl SalesTrend {
    /// Build from `(first day of month, revenue)` pairs, oldest first.
    ///
    /// Growth is `(last - previous) / previous`, rounded half-up to two
    /// decimals, times 100. A zero previous month reports `0` and
    /// [`TrendDirection::Stable`]. With fewer than two months there is no
    /// trend.
    #[must_use]
    pub fn from_monthly(months: &[(NaiveDate, Decimal)]) -> Self {
        let labels = months.iter().map(|(month, _)| month_label(*month)).collect();
        let sales: Vec<Decimal> = months.iter().map(|(_, amount)| *amount).collect();

        let (trend, trend_direction) = match sales.as_slice() {
            [.., previous, _] if previous.is_zero() => (Some(0.0), Some(TrendDirection::Stable)),
            [.., previous, current] => {
                let growth = ((*current - *previous) / *previous)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                    * Decimal::ONE_HUNDRED;
                let direction = if growth.is_sign_negative() && !growth.is_zero() {
                    TrendDirection::Down
                } else {
                    TrendDirection::Up
                };
                (growth.to_f64(), Some(direction))
            }
            _ => (None, None),
        };

        Self {
            labels,
            sales,
            trend,
            trend_direction,
        }
    }

    /// `(label, amount)` pairs, oldest month first.
    #[must_use]
    pub fn rows(&self) -> Vec<(&str, Decimal)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.sales.iter().copied())
            .collect()
    }

    /// Whether there is anything to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// "avr. 2024"
fn month_label(month: NaiveDate) -> String {
    let name = FRENCH_MONTHS
        .get(month.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{name} {}", month.year())
}

/// First day of each of the `count` months ending with the month of `today`.
#[must_use]
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let first = today.with_day(1).unwrap_or(today);
    (0..count)
        .rev()
        .filter_map(|back| first.checked_sub_months(chrono::Months::new(back)))
        .collect()
}

/// One entry of the dashboard's activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub id: OrderId,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub status: OrderStatus,
    pub amount: Decimal,
}

impl RecentActivity {
    #[must_use]
    pub fn order(
        id: OrderId,
        status: OrderStatus,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            activity_type: "ORDER".to_string(),
            description: format!("Nouvelle commande #{id}"),
            timestamp: created_at,
            status,
            amount,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_growth_up() {
        let trend = SalesTrend::from_monthly(&[
            (month(2024, 3), dec!(1000)),
            (month(2024, 4), dec!(1250)),
        ]);
        assert_eq!(trend.labels, vec!["mars 2024", "avr. 2024"]);
        assert_eq!(trend.trend, Some(25.0));
        assert_eq!(trend.trend_direction, Some(TrendDirection::Up));
    }

    #[test]
    fn test_growth_rounds_half_up_before_scaling() {
        // 1/3 = 0.333.. -> 0.33 -> 33
        let trend = SalesTrend::from_monthly(&[
            (month(2024, 1), dec!(300)),
            (month(2024, 2), dec!(400)),
        ]);
        assert_eq!(trend.trend, Some(33.0));

        // -0.125 -> -0.13 -> -13
        let trend = SalesTrend::from_monthly(&[
            (month(2024, 1), dec!(800)),
            (month(2024, 2), dec!(700)),
        ]);
        assert_eq!(trend.trend, Some(-13.0));
        assert_eq!(trend.trend_direction, Some(TrendDirection::Down));
    }

    #[test]
    fn test_zero_previous_month_is_stable() {
        let trend = SalesTrend::from_monthly(&[
            (month(2023, 12), Decimal::ZERO),
            (month(2024, 1), dec!(500)),
        ]);
        assert_eq!(trend.trend, Some(0.0));
        assert_eq!(trend.trend_direction, Some(TrendDirection::Stable));
        assert_eq!(trend.labels, vec!["déc. 2023", "janv. 2024"]);
    }

    #[test]
    fn test_single_month_has_no_trend() {
        let trend = SalesTrend::from_monthly(&[(month(2024, 1), dec!(500))]);
        assert!(trend.trend.is_none());
        assert!(trend.trend_direction.is_none());
        assert!(!trend.is_empty());
        assert!(SalesTrend::default().is_empty());
    }

    #[test]
    fn test_rows_pair_labels_with_amounts() {
        let trend = SalesTrend::from_monthly(&[
            (month(2024, 4), dec!(900)),
            (month(2024, 5), dec!(1200.5)),
        ]);
        assert_eq!(
            trend.rows(),
            vec![("avr. 2024", dec!(900)), ("mai 2024", dec!(1200.5))]
        );
        assert!(SalesTrend::default().rows().is_empty());
    }

    #[test]
    fn test_trailing_months_cross_year() {
        let months = trailing_months(NaiveDate::from_ymd_opt(2024, 2, 17).unwrap(), 6);
        assert_eq!(months.len(), 6);
        assert_eq!(months.first(), Some(&month(2023, 9)));
        assert_eq!(months.last(), Some(&month(2024, 2)));
    }

    #[test]
    fn test_order_status_counts() {
        let by_status = HashMap::from([
            (OrderStatus::Pending, 2),
            (OrderStatus::Confirmed, 1),
            (OrderStatus::Processing, 3),
            (OrderStatus::Shipped, 4),
            (OrderStatus::Delivered, 10),
            (OrderStatus::Cancelled, 1),
        ]);
        let counts = OrderStatusCounts::from_status_totals(&by_status, 5);
        assert_eq!(counts.total, 21);
        assert_eq!(counts.pending, 6);
        assert_eq!(counts.completed, 14);
        assert_eq!(counts.today, 5);
    }

    #[test]
    fn test_conversion_rate_needs_both_counts() {
        let mut stats = DashboardStats::default();
        stats.order_status_count.completed = 5;
        stats.update_conversion_rate();
        assert!(stats.conversion_rate.abs() < f64::EPSILON);

        stats.user_stats.active = 20;
        stats.update_conversion_rate();
        assert!((stats.conversion_rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recent_activity_shape() {
        let activity = RecentActivity::order(
            OrderId::new(42),
            OrderStatus::Pending,
            dec!(129.90),
            Utc::now(),
        );
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "ORDER");
        assert_eq!(json["description"], "Nouvelle commande #42");
        assert_eq!(json["status"], "PENDING");
    }
}
