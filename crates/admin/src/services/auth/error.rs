//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bacoge_core::EmailError),

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Too many failed attempts for this email.
    #[error("too many failed attempts, try again later")]
    LockedOut,

    /// The account exists but is not an admin, or is disabled.
    #[error("this account cannot access the back office")]
    NotAdmin,

    /// Hashing failed or a stored hash could not be parsed.
    #[error("password hash error: {0}")]
    Hash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
