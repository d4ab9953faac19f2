//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! bacoge-cli admin create -e admin@bacoge.com -f Camille -l Martin -p 'S3cret!pass'
//! ```
//!
//! # Environment Variables
//!
//! Reads the same configuration as the admin server (`ADMIN_DATABASE_URL`,
//! `ADMIN_BASE_URL`, `APP_SECURITY_PASSWORD_*`).

use bacoge_admin::config::{AdminConfig, ConfigError, PasswordPolicy};
use bacoge_admin::db::{RepositoryError, UserRepository};
use bacoge_admin::models::NewUser;
use bacoge_admin::services::{AdminAuthError, hash_password};
use bacoge_core::{Email, EmailError, UserId, UserRole};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password breaks the configured policy; one message per rule.
    #[error("Validation failed: password {}", .0.join(", "))]
    WeakPassword(Vec<String>),

    #[error("Admin user already exists with email: {0}")]
    UserExists(String),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] AdminAuthError),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Reject passwords that break the policy before anything touches the
/// database.
fn check_password(policy: &PasswordPolicy, password: &str) -> Result<(), AdminError> {
    policy.check(password).map_err(AdminError::WeakPassword)
}

/// Create a new admin user.
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns `AdminError` if the input is invalid, the email is taken or the
/// database is unreachable.
pub async fn create_user(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<UserId, AdminError> {
    let config = AdminConfig::from_env()?;

    let email = Email::parse(email)?;
    check_password(&config.security.password, password)?;
    let password_hash = hash_password(password)?;

    tracing::info!("Connecting to admin database...");
    let pool = bacoge_admin::db::create_pool(&config.database_url).await?;

    let new_user = NewUser {
        email: email.clone(),
        password_hash,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        role: UserRole::Admin,
    };

    let user = UserRepository::new(&pool)
        .insert(&new_user)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_password_is_keyed_by_password() {
        let policy = PasswordPolicy::default();
        let err = check_password(&policy, "abc").unwrap_err();

        assert!(matches!(err, AdminError::WeakPassword(ref problems) if !problems.is_empty()));
        assert!(err.to_string().starts_with("Validation failed: password "));
    }

    #[test]
    fn test_strong_password_passes() {
        let policy = PasswordPolicy::default();
        assert!(check_password(&policy, "Chantier-2024!").is_ok());
    }
}
