//! Promotion counters for the dashboard.

use async_trait::async_trait;
use bacoge_core::PromotionStatus;
use chrono::Utc;
use sqlx::PgPool;

use super::ServiceError;
use crate::db::PromotionRepository;

#[async_trait]
pub trait PromotionService: Send + Sync {
    async fn total_promotions(&self) -> Result<i64, ServiceError>;

    /// Promotions that could be applied right now.
    async fn active_promotions(&self) -> Result<i64, ServiceError>;

    /// Promotions whose end date has passed.
    async fn expired_promotions(&self) -> Result<i64, ServiceError>;
}

/// [`PromotionService`] backed by `PostgreSQL`.
pub struct PgPromotionService {
    pool: PgPool,
}

impl PgPromotionService {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromotionService for PgPromotionService {
    async fn total_promotions(&self) -> Result<i64, ServiceError> {
        Ok(PromotionRepository::new(&self.pool).count().await?)
    }

    async fn active_promotions(&self) -> Result<i64, ServiceError> {
        let now = Utc::now();
        let active = PromotionRepository::new(&self.pool)
            .list_by_status(PromotionStatus::Active)
            .await?
            .iter()
            .filter(|promotion| promotion.is_valid(now))
            .count();

        i64::try_from(active).map_err(|e| ServiceError::InvalidArgument(e.to_string()))
    }

    async fn expired_promotions(&self) -> Result<i64, ServiceError> {
        Ok(PromotionRepository::new(&self.pool)
            .count_expired(Utc::now())
            .await?)
    }
}
