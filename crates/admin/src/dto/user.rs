use bacoge_core::{Email, UserId, UserRole, UserStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::User;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            country: user.country,
            city: user.city,
            address: user.address,
            birth_date: user.birth_date,
            gender: user.gender,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registrations and activity over a reporting window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReportDto {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// All accounts.
    pub total_users: i64,
    /// Accounts created inside the window.
    pub new_users: i64,
    /// Accounts with status `ACTIVE`.
    pub active_users: i64,
    /// `new_users` as a percentage of `total_users`.
    pub conversion_rate: f64,
    /// Accounts created up to `period_end`.
    pub total_registrations: i64,
}

impl UserReportDto {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        total_users: i64,
        new_users: i64,
        active_users: i64,
        total_registrations: i64,
    ) -> Self {
        let conversion_rate = if total_users > 0 {
            new_users as f64 / total_users as f64 * 100.0
        } else {
            0.0
        };
        Self {
            period_start,
            period_end,
            total_users,
            new_users,
            active_users,
            conversion_rate,
            total_registrations,
        }
    }
}
