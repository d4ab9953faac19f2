//! Database operations for the back-office `PostgreSQL` database.
//!
//! # Tables
//!
//! - `users` - Customers and admins (role column)
//! - `addresses` - Postal addresses owned by users
//! - `categories`, `products` - Catalogue
//! - `promotions` - Discount campaigns
//! - `product_reviews` - Moderated reviews
//! - `orders`, `order_items` - Sales
//! - `conversations`, `messages` - Support inbox
//! - `admin_session` - tower-sessions store
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p bacoge-cli -- migrate
//! ```

pub mod addresses;
pub mod categories;
pub mod dashboard;
pub mod messages;
pub mod orders;
pub mod promotions;
pub mod reviews;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use categories::CategoryRepository;
pub use dashboard::DashboardRepository;
pub use messages::MessageRepository;
pub use orders::OrderRepository;
pub use promotions::PromotionRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

use crate::models::AddressError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique, foreign-key or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// An address broke its naming rule before reaching the database.
    #[error(transparent)]
    Address(#[from] AddressError),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation() =>
            {
                Self::Conflict(db.message().to_string())
            }
            _ => Self::Database(err),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Violation {
        Unique,
        ForeignKey,
        Check,
        Timeout,
    }

    #[derive(Debug)]
    struct PgFailure(Violation);

    impl fmt::Display for PgFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message())
        }
    }

    impl StdError for PgFailure {}

    impl DatabaseError for PgFailure {
        fn message(&self) -> &str {
            match self.0 {
                Violation::Unique => {
                    "duplicate key value violates unique constraint \"categories_name_key\""
                }
                Violation::ForeignKey => {
                    "insert or update on table \"addresses\" violates foreign key constraint"
                }
                Violation::Check => {
                    "new row violates check constraint \"addresses_name_check\""
                }
                Violation::Timeout => "canceling statement due to statement timeout",
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                Violation::Unique => ErrorKind::UniqueViolation,
                Violation::ForeignKey => ErrorKind::ForeignKeyViolation,
                Violation::Check => ErrorKind::CheckViolation,
                Violation::Timeout => ErrorKind::Other,
            }
        }
    }

    fn db_error(violation: Violation) -> sqlx::Error {
        sqlx::Error::Database(Box::new(PgFailure(violation)))
    }

    #[test]
    fn test_constraint_violations_map_to_conflict() {
        for violation in [Violation::Unique, Violation::ForeignKey, Violation::Check] {
            match RepositoryError::from(db_error(violation)) {
                RepositoryError::Conflict(message) => {
                    assert_eq!(message, PgFailure(violation).message());
                }
                other => panic!("expected conflict for {violation:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_other_database_errors_stay_database() {
        assert!(matches!(
            RepositoryError::from(db_error(Violation::Timeout)),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::RowNotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn test_other_errors_stay_database() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::PoolTimedOut),
            RepositoryError::Database(_)
        ));
    }
}
