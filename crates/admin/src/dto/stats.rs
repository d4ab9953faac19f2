//! Per-entity counters shown on the admin reporting screens.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Start instants of the reporting periods containing `now`, all in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriods {
    pub now: DateTime<Utc>,
    pub start_of_day: DateTime<Utc>,
    /// Monday 00:00 of the ISO week.
    pub start_of_week: DateTime<Utc>,
    pub start_of_month: DateTime<Utc>,
    pub start_of_year: DateTime<Utc>,
}

impl ReportPeriods {
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let midnight = |date: chrono::NaiveDate| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));

        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let first_of_month = today.with_day(1).unwrap_or(today);
        let first_of_year = today.with_ordinal(1).unwrap_or(today);

        Self {
            now,
            start_of_day: midnight(today),
            start_of_week: midnight(monday),
            start_of_month: midnight(first_of_month),
            start_of_year: midnight(first_of_year),
        }
    }
}

/// Counts of rows created since each period start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewCounts {
    pub today: i64,
    pub this_week: i64,
    pub this_month: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressStatsDto {
    pub total_addresses: i64,
    pub default_addresses: i64,
    pub non_default_addresses: i64,
    pub new_today: i64,
    pub new_this_week: i64,
    pub new_this_month: i64,
    pub last_updated: DateTime<Utc>,
}

impl AddressStatsDto {
    #[must_use]
    pub fn new(total: i64, default: i64, new: NewCounts, now: DateTime<Utc>) -> Self {
        Self {
            total_addresses: total,
            default_addresses: default,
            non_default_addresses: total - default,
            new_today: new.today,
            new_this_week: new.this_week,
            new_this_month: new.this_month,
            last_updated: now,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionStatsDto {
    pub total_promotions: i64,
    pub active_promotions: i64,
    pub inactive_promotions: i64,
    pub expired_promotions: i64,
    pub new_today: i64,
    pub new_this_week: i64,
    pub new_this_month: i64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatsDto {
    pub total_reviews: i64,
    pub approved_reviews: i64,
    pub pending_reviews: i64,
    pub rejected_reviews: i64,
    /// Mean rating over all reviews, 0 when there are none.
    pub average_rating: f64,
    pub new_today: i64,
    pub new_this_week: i64,
    pub new_this_month: i64,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_mid_week() {
        // Thursday
        let now = Utc.with_ymd_and_hms(2024, 5, 16, 14, 45, 10).unwrap();
        let p = ReportPeriods::at(now);

        assert_eq!(p.start_of_day, Utc.with_ymd_and_hms(2024, 5, 16, 0, 0, 0).unwrap());
        assert_eq!(p.start_of_week, Utc.with_ymd_and_hms(2024, 5, 13, 0, 0, 0).unwrap());
        assert_eq!(p.start_of_month, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(p.start_of_year, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_can_start_in_previous_month() {
        // Sunday 2 June 2024; the week began Monday 27 May
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let p = ReportPeriods::at(now);
        assert_eq!(p.start_of_week, Utc.with_ymd_and_hms(2024, 5, 27, 0, 0, 0).unwrap());
        assert_eq!(p.start_of_month, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_address_stats_derives_non_default() {
        let now = Utc::now();
        let dto = AddressStatsDto::new(
            12,
            4,
            NewCounts {
                today: 1,
                this_week: 3,
                this_month: 5,
            },
            now,
        );
        assert_eq!(dto.non_default_addresses, 8);
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["totalAddresses"], 12);
        assert_eq!(json["newThisWeek"], 3);
    }
}
