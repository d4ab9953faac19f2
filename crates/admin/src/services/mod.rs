//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password login for admins, with lockout after repeated failures
//! - `dashboard` - Dashboard statistics and activity feed (cached)
//! - `promotions` - Promotion counters shown on the dashboard
//!
//! The dashboard and promotion services are traits so the routes can be
//! exercised without a database.

pub mod auth;
pub mod dashboard;
pub mod promotions;

use thiserror::Error;

use crate::db::RepositoryError;

pub use auth::{AdminAuthError, AdminAuthService, LoginAttempts, hash_password, verify_password};
pub use dashboard::{DashboardService, PgDashboardService};
pub use promotions::{PgPromotionService, PromotionService};

/// Errors raised by services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A caller passed a value the operation cannot work with.
    #[error("{0}")]
    InvalidArgument(String),
}
