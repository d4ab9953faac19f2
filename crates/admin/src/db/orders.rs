//! Order repository: line items and the order reports.

use bacoge_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::dto::{OrderChartDto, TopSellingProductDto};
use crate::models::{Order, OrderItem};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    order_number: String,
    user_id: Option<UserId>,
    customer_name: Option<String>,
    total_amount: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            order_number: row.order_number,
            user_id: row.user_id,
            customer_name: row.customer_name,
            total_amount: row.total_amount,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    price: Decimal,
    total_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.price,
            total_price: row.total_price,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChartRow {
    day: DateTime<Utc>,
    status: OrderStatus,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct TopSellingRow {
    product_id: ProductId,
    product_name: String,
    category_name: Option<String>,
    sales_count: i64,
    sales_value: Decimal,
    stock_quantity: i32,
}

impl From<TopSellingRow> for TopSellingProductDto {
    fn from(row: TopSellingRow) -> Self {
        let average_price = if row.sales_count > 0 {
            (row.sales_value / Decimal::from(row.sales_count)).round_dp(2)
        } else {
            Decimal::ZERO
        };
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            category_name: row.category_name,
            sales_count: row.sales_count,
            sales_value: row.sales_value,
            average_price,
            stock_quantity: row.stock_quantity,
        }
    }
}

pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Line items of one order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                   oi.quantity, oi.price, oi.total_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Orders per day and status since `since`, oldest day first.
    ///
    /// `orders` is the day's total across statuses, `count` the number for
    /// the row's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn chart(&self, since: DateTime<Utc>) -> Result<Vec<OrderChartDto>, RepositoryError> {
        let rows = sqlx::query_as::<_, ChartRow>(
            r#"
            SELECT date_trunc('day', created_at) AS day, status, COUNT(*) AS count
            FROM orders
            WHERE created_at >= $1
            GROUP BY day, status
            ORDER BY day, status
            "#,
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        let mut chart = Vec::with_capacity(rows.len());
        for row in &rows {
            let orders = rows
                .iter()
                .filter(|other| other.day == row.day)
                .map(|other| other.count)
                .sum();
            chart.push(OrderChartDto {
                date: row.day,
                orders,
                status: row.status.to_string(),
                count: row.count,
            });
        }
        Ok(chart)
    }

    /// Best sellers by units sold across non-cancelled orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_selling(&self, limit: i64) -> Result<Vec<TopSellingProductDto>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopSellingRow>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name, c.name AS category_name,
                   SUM(oi.quantity)::BIGINT AS sales_count,
                   SUM(oi.total_price) AS sales_value,
                   p.stock_quantity
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE o.status <> 'CANCELLED'
            GROUP BY p.id, p.name, c.name, p.stock_quantity
            ORDER BY sales_count DESC, sales_value DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// The most recently placed orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.order_number, o.user_id,
                   NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS customer_name,
                   o.total_amount, o.status, o.created_at
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_average_price_from_totals() {
        let dto: TopSellingProductDto = TopSellingRow {
            product_id: ProductId::new(4),
            product_name: "Sac de ciment 35 kg".to_string(),
            category_name: Some("Ciment".to_string()),
            sales_count: 3,
            sales_value: dec!(40.00),
            stock_quantity: 120,
        }
        .into();
        assert_eq!(dto.average_price, dec!(13.33));
    }

    #[test]
    fn test_average_price_without_sales() {
        let dto: TopSellingProductDto = TopSellingRow {
            product_id: ProductId::new(4),
            product_name: "Parpaing".to_string(),
            category_name: None,
            sales_count: 0,
            sales_value: Decimal::ZERO,
            stock_quantity: 0,
        }
        .into();
        assert_eq!(dto.average_price, Decimal::ZERO);
    }
}
