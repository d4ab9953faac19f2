//! Address repository.
//!
//! Inserts run [`Address::prepare_insert`] and updates run
//! [`Address::touch`] before the statement is sent.

use bacoge_core::{AddressId, AddressType, UserId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::RepositoryError;
use crate::config::Pagination;
use crate::dto::stats::{AddressStatsDto, NewCounts, ReportPeriods};
use crate::models::Address;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `addresses` queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    name: Option<String>,
    address_name: Option<String>,
    street: String,
    city: String,
    postal_code: String,
    country: String,
    #[sqlx(rename = "type")]
    address_type: AddressType,
    is_default: bool,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self::from_parts(
            row.id,
            row.name,
            row.address_name,
            row.street,
            row.city,
            row.postal_code,
            row.country,
            row.address_type,
            row.is_default,
            row.user_id,
            row.created_at,
            row.updated_at,
        )
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of addresses, newest first, optionally for one user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        pagination: Pagination,
        user_id: Option<UserId>,
    ) -> Result<(Vec<Address>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT id, name, address_name, street, city, postal_code, country, type,
                   is_default, user_id, created_at, updated_at
            FROM addresses
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM addresses WHERE ($1::BIGINT IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok((rows.into_iter().map(Address::from).collect(), total))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT id, name, address_name, street, city, postal_code, country, type,
                   is_default, user_id, created_at, updated_at
            FROM addresses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Insert a new address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Address` if neither label is set,
    /// `RepositoryError::Conflict` if the owning user does not exist.
    pub async fn insert(&self, mut address: Address) -> Result<Address, RepositoryError> {
        address.prepare_insert(Utc::now())?;

        let row = sqlx::query_as::<_, AddressRow>(
            r#"
            INSERT INTO addresses
                (name, address_name, street, city, postal_code, country, type,
                 is_default, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, address_name, street, city, postal_code, country, type,
                      is_default, user_id, created_at, updated_at
            "#,
        )
        .bind(address.name())
        .bind(address.address_name())
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.postal_code)
        .bind(&address.country)
        .bind(address.address_type)
        .bind(address.is_default)
        .bind(address.user_id)
        .bind(address.created_at)
        .bind(address.updated_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Persist changes to an existing address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address has no id or no
    /// longer exists.
    pub async fn update(&self, mut address: Address) -> Result<Address, RepositoryError> {
        let id = address.id.ok_or(RepositoryError::NotFound)?;
        address.touch(Utc::now());

        let row = sqlx::query_as::<_, AddressRow>(
            r#"
            UPDATE addresses
            SET name = $2, address_name = $3, street = $4, city = $5, postal_code = $6,
                country = $7, type = $8, is_default = $9, updated_at = $10
            WHERE id = $1
            RETURNING id, name, address_name, street, city, postal_code, country, type,
                      is_default, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(address.name())
        .bind(address.address_name())
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.postal_code)
        .bind(&address.country)
        .bind(address.address_type)
        .bind(address.is_default)
        .bind(address.updated_at)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing was deleted.
    pub async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self, periods: ReportPeriods) -> Result<AddressStatsDto, RepositoryError> {
        let (total, default, today, this_week, this_month): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE is_default),
                       COUNT(*) FILTER (WHERE created_at >= $1),
                       COUNT(*) FILTER (WHERE created_at >= $2),
                       COUNT(*) FILTER (WHERE created_at >= $3)
                FROM addresses
                "#,
            )
            .bind(periods.start_of_day)
            .bind(periods.start_of_week)
            .bind(periods.start_of_month)
            .fetch_one(self.pool)
            .await?;

        Ok(AddressStatsDto::new(
            total,
            default,
            NewCounts {
                today,
                this_week,
                this_month,
            },
            periods.now,
        ))
    }
}
