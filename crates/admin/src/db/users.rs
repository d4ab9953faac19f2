//! User repository for database operations.
//!
//! Customers and admins share the `users` table; admins are rows with role
//! `ADMIN`. The password hash is only read by
//! [`UserRepository::find_credentials_by_email`].

use bacoge_core::{Email, UserId, UserRole, UserStatus};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use super::RepositoryError;
use crate::config::Pagination;
use crate::models::{NewUser, User, UserCredentials};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `users` queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    country: Option<String>,
    city: Option<String>,
    address: Option<String>,
    birth_date: Option<NaiveDate>,
    gender: Option<String>,
    role: UserRole,
    status: UserStatus,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            country: row.country,
            city: row.city,
            address: row.address,
            birth_date: row.birth_date,
            gender: row.gender,
            role: row.role,
            status: row.status,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user accounts.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(&self, pagination: Pagination) -> Result<(Vec<User>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, phone_number, country, city, address,
                   birth_date, gender, role, status, last_login, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let total = self.count().await?;
        let users = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total))
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, phone_number, country, city, address,
                   birth_date, gender, role, status, last_login, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Look up a user and their password hash for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT id, email, first_name, last_name, phone_number, country, city, address,
                   birth_date, gender, role, status, last_login, created_at, updated_at,
                   password_hash
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| {
            Ok(UserCredentials {
                user: row.user.try_into()?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn insert(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role, status)
            VALUES ($1, $2, $3, $4, $5, 'ACTIVE')
            RETURNING id, email, first_name, last_name, phone_number, country, city, address,
                      birth_date, gender, role, status, last_login, created_at, updated_at
            "#,
        )
        .bind(new_user.email.as_str())
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(new_user.role)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Stamp a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Counters for the user report over `[start, end]`: all users, users
    /// created in the window, active users, and users created up to `end`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn report_counts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(i64, i64, i64, i64), RepositoryError> {
        let counts = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE created_at BETWEEN $1 AND $2),
                   COUNT(*) FILTER (WHERE status = 'ACTIVE'),
                   COUNT(*) FILTER (WHERE created_at <= $2)
            FROM users
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}
