//! Promotions and discount arithmetic.

use bacoge_core::{DiscountType, PromotionId, PromotionStatus};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::services::ServiceError;

/// A discount campaign, optionally behind a promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: PromotionId,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_percentage: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub promo_code: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_order_amount: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub status: PromotionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    /// Whether the promotion can be applied at `now`.
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        if self.status != PromotionStatus::Active {
            return false;
        }
        if now < self.start_date || now > self.end_date {
            return false;
        }
        if self.max_uses.is_some_and(|max| self.current_uses >= max) {
            return false;
        }

        match self.discount_type {
            DiscountType::Percentage => self
                .discount_percentage
                .is_some_and(|pct| pct > Decimal::ZERO && pct <= Decimal::ONE_HUNDRED),
            DiscountType::FixedAmount => self.discount_amount.is_some(),
        }
    }

    /// Whether the end date has passed, regardless of status.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_date < now
    }

    /// Price after this promotion, floored at zero.
    ///
    /// An invalid promotion leaves the price unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidArgument` for a negative price.
    pub fn discounted_price(
        &self,
        original: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal, ServiceError> {
        if original.is_sign_negative() && !original.is_zero() {
            return Err(ServiceError::InvalidArgument(
                "original price cannot be negative".to_string(),
            ));
        }
        if !self.is_valid(now) {
            return Ok(original);
        }

        let discounted = match self.discount_type {
            DiscountType::Percentage => {
                let pct = self.discount_percentage.unwrap_or_default();
                let multiplier = (pct / Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
                original - original * multiplier
            }
            DiscountType::FixedAmount => original - self.discount_amount.unwrap_or_default(),
        };

        Ok(discounted.max(Decimal::ZERO))
    }
}
