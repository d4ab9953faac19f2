use bacoge_core::{OrderId, OrderItemId, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::OrderItem;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}

/// One point of the orders chart: orders with `status` placed on `date`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderChartDto {
    /// Midnight UTC of the day.
    pub date: DateTime<Utc>,
    /// All orders placed that day.
    pub orders: i64,
    pub status: String,
    /// Orders placed that day with `status`.
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingProductDto {
    pub product_id: ProductId,
    pub product_name: String,
    pub category_name: Option<String>,
    /// Units sold.
    pub sales_count: i64,
    pub sales_value: Decimal,
    pub average_price: Decimal,
    pub stock_quantity: i32,
}
