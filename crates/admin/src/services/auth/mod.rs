//! Admin authentication service.
//!
//! Admins sign in with email and password. Hashes are Argon2 PHC strings.
//! Failed attempts are counted per email in [`LoginAttempts`]; once
//! `max_attempts` is reached the email is locked until its counter expires.

mod error;

pub use error::AdminAuthError;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use moka::future::Cache;
use sqlx::PgPool;

use bacoge_core::{Email, UserStatus};

use crate::config::LoginProperties;
use crate::db::UserRepository;
use crate::models::User;

/// Hash a password into an Argon2 PHC string.
///
/// # Errors
///
/// Returns `AdminAuthError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminAuthError::Hash(e.to_string()))?
        .to_string();

    Ok(hash)
}

/// Check a password against a stored PHC string.
///
/// # Errors
///
/// Returns `AdminAuthError::Hash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AdminAuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AdminAuthError::Hash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Failed login counter, keyed by lower-cased email.
///
/// Each failure rewrites the entry, so the lockout window restarts from the
/// most recent failure.
#[derive(Clone)]
pub struct LoginAttempts {
    failures: Cache<String, u32>,
    max_attempts: u32,
}

impl LoginAttempts {
    #[must_use]
    pub fn new(properties: &LoginProperties) -> Self {
        Self {
            failures: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(properties.lockout_duration)
                .build(),
            max_attempts: properties.max_attempts,
        }
    }

    fn key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Whether `email` has used up its attempts.
    pub async fn is_locked(&self, email: &str) -> bool {
        self.failures
            .get(&Self::key(email))
            .await
            .is_some_and(|count| count >= self.max_attempts)
    }

    /// Count a failure and return the running total.
    pub async fn record_failure(&self, email: &str) -> u32 {
        let key = Self::key(email);
        let count = self.failures.get(&key).await.unwrap_or(0).saturating_add(1);
        self.failures.insert(key, count).await;
        count
    }

    /// Forget failures after a successful login.
    pub async fn clear(&self, email: &str) {
        self.failures.invalidate(&Self::key(email)).await;
    }
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: UserRepository<'a>,
    attempts: &'a LoginAttempts,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, attempts: &'a LoginAttempts) -> Self {
        Self {
            users: UserRepository::new(pool),
            attempts,
        }
    }

    /// Verify an admin's email and password.
    ///
    /// Wrong passwords count towards the lockout; unknown emails do too so
    /// the response does not reveal which accounts exist.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::LockedOut` while the email is locked.
    /// Returns `AdminAuthError::InvalidCredentials` for an unknown email or
    /// a wrong password.
    /// Returns `AdminAuthError::NotAdmin` for client or inactive accounts.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AdminAuthError> {
        if self.attempts.is_locked(email).await {
            tracing::warn!(email, "login attempt while locked out");
            return Err(AdminAuthError::LockedOut);
        }

        let Ok(parsed) = Email::parse(email) else {
            self.attempts.record_failure(email).await;
            return Err(AdminAuthError::InvalidCredentials);
        };

        let Some(credentials) = self.users.find_credentials_by_email(&parsed).await? else {
            self.attempts.record_failure(email).await;
            return Err(AdminAuthError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash)? {
            let failures = self.attempts.record_failure(email).await;
            tracing::info!(email, failures, "wrong password");
            return Err(AdminAuthError::InvalidCredentials);
        }

        let user = credentials.user;
        if !user.is_admin() || user.status != UserStatus::Active {
            return Err(AdminAuthError::NotAdmin);
        }

        self.attempts.clear(email).await;
        self.users.record_login(user.id, Utc::now()).await?;

        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn attempts(max_attempts: u32) -> LoginAttempts {
        LoginAttempts::new(&LoginProperties {
            max_attempts,
            lockout_duration: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Béton#2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Béton#2024", &hash).unwrap());
        assert!(!verify_password("beton#2024", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("x", "not-a-hash"),
            Err(AdminAuthError::Hash(_))
        ));
    }

    #[tokio::test]
    async fn test_locks_after_max_attempts() {
        let attempts = attempts(3);
        for _ in 0..2 {
            attempts.record_failure("chef@bacoge.com").await;
        }
        assert!(!attempts.is_locked("chef@bacoge.com").await);

        assert_eq!(attempts.record_failure("chef@bacoge.com").await, 3);
        assert!(attempts.is_locked("chef@bacoge.com").await);
        assert!(!attempts.is_locked("autre@bacoge.com").await);
    }

    #[tokio::test]
    async fn test_email_key_ignores_case() {
        let attempts = attempts(1);
        attempts.record_failure("Chef@Bacoge.com ").await;
        assert!(attempts.is_locked("chef@bacoge.com").await);
    }

    #[tokio::test]
    async fn test_clear_unlocks() {
        let attempts = attempts(1);
        attempts.record_failure("chef@bacoge.com").await;
        attempts.clear("chef@bacoge.com").await;
        assert!(!attempts.is_locked("chef@bacoge.com").await);
    }
}
