//! Response and request shapes for the admin JSON API and dashboard.
//!
//! All DTOs serialize as camelCase.

pub mod address;
pub mod category;
pub mod dashboard;
pub mod message;
pub mod order;
pub mod page;
pub mod review;
pub mod stats;
pub mod user;

pub use address::{CreateAddressRequest, UpdateAddressRequest};
pub use category::{CategoryDto, CreateCategoryRequest};
pub use dashboard::{
    CategorySales, DashboardStats, OrderStatusCounts, ProductStats, RecentActivity, SalesTrend,
    TrendDirection, UserStats,
};
pub use message::MessageDto;
pub use order::{OrderChartDto, OrderItemDto, TopSellingProductDto};
pub use page::Page;
pub use review::UpdateReviewStatusRequest;
pub use stats::{AddressStatsDto, PromotionStatsDto, ReportPeriods, ReviewStatsDto};
pub use user::{UserDto, UserReportDto};
