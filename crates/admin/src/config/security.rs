//! `app.security.*` properties: password policy, login lockout and CORS.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};

use super::{ConfigError, EnvLookup, parse_flag, parse_list, parse_or};

/// Smallest minimum length the policy may be configured with.
pub const PASSWORD_MIN_LENGTH_FLOOR: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityProperties {
    pub password: PasswordPolicy,
    pub login: LoginProperties,
    pub cors: CorsProperties,
}

impl SecurityProperties {
    pub(super) fn from_lookup(env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            password: PasswordPolicy::from_lookup(env)?,
            login: LoginProperties::from_lookup(env)?,
            cors: CorsProperties::from_lookup(env)?,
        })
    }
}

// =============================================================================
// Password policy
// =============================================================================

/// Rules a new admin password must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special_char: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special_char: true,
        }
    }
}

impl PasswordPolicy {
    fn from_lookup(env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let policy = Self {
            min_length: parse_or(env, "APP_SECURITY_PASSWORD_MIN_LENGTH", d.min_length)?,
            require_uppercase: parse_flag(
                env,
                "APP_SECURITY_PASSWORD_REQUIRE_UPPERCASE",
                d.require_uppercase,
            )?,
            require_lowercase: parse_flag(
                env,
                "APP_SECURITY_PASSWORD_REQUIRE_LOWERCASE",
                d.require_lowercase,
            )?,
            require_digit: parse_flag(env, "APP_SECURITY_PASSWORD_REQUIRE_DIGIT", d.require_digit)?,
            require_special_char: parse_flag(
                env,
                "APP_SECURITY_PASSWORD_REQUIRE_SPECIAL_CHAR",
                d.require_special_char,
            )?,
        };

        if policy.min_length < PASSWORD_MIN_LENGTH_FLOOR {
            return Err(ConfigError::InvalidEnvVar(
                "APP_SECURITY_PASSWORD_MIN_LENGTH".to_string(),
                format!("must be at least {PASSWORD_MIN_LENGTH_FLOOR}"),
            ));
        }
        Ok(policy)
    }

    /// Check `password` against every rule.
    ///
    /// # Errors
    ///
    /// Returns one message per broken rule.
    pub fn check(&self, password: &str) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if password.chars().count() < self.min_length {
            problems.push(format!(
                "must be at least {} characters long",
                self.min_length
            ));
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            problems.push("must contain an uppercase letter".to_string());
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            problems.push("must contain a lowercase letter".to_string());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            problems.push("must contain a digit".to_string());
        }
        if self.require_special_char && password.chars().all(char::is_alphanumeric) {
            problems.push("must contain a special character".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

// =============================================================================
// Login lockout
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginProperties {
    /// Failed attempts allowed before the account is locked.
    pub max_attempts: u32,
    /// How long a locked account stays locked.
    pub lockout_duration: Duration,
}

impl Default for LoginProperties {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_duration: Duration::from_secs(30 * 60),
        }
    }
}

impl LoginProperties {
    fn from_lookup(env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let max_attempts = parse_or(env, "APP_SECURITY_LOGIN_MAX_ATTEMPTS", d.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "APP_SECURITY_LOGIN_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let key = "APP_SECURITY_LOGIN_LOCKOUT_DURATION";
        let lockout_duration = match env(key).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_duration(&raw)
                .ok_or_else(|| ConfigError::InvalidEnvVar(key.to_string(), format!("invalid duration '{raw}'")))?,
            None => d.lockout_duration,
        };

        Ok(Self {
            max_attempts,
            lockout_duration,
        })
    }
}

/// Parse `30m`, `45s`, `2h`, `1d`, ISO-8601 `PT1H30M`, or bare seconds.
fn parse_duration(raw: &str) -> Option<Duration> {
    let s = raw.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    if let Some(iso) = s.strip_prefix("PT").or_else(|| s.strip_prefix("pt")) {
        return parse_iso_time(iso);
    }

    let split = s.find(|c: char| !c.is_ascii_digit())?;
    let (amount, unit) = s.split_at(split);
    let amount: u64 = amount.parse().ok()?;
    let multiplier = match unit.trim() {
        "s" | "sec" | "secs" => 1,
        "m" | "min" | "mins" => 60,
        "h" | "hr" | "hrs" => 3_600,
        "d" => 86_400,
        _ => return None,
    };
    amount.checked_mul(multiplier).map(Duration::from_secs)
}

/// The time part of an ISO-8601 duration, after `PT`.
fn parse_iso_time(iso: &str) -> Option<Duration> {
    if iso.is_empty() {
        return None;
    }
    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in iso.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let amount: u64 = digits.parse().ok()?;
        digits.clear();
        let unit = match c.to_ascii_uppercase() {
            'H' => 3_600,
            'M' => 60,
            'S' => 1,
            _ => return None,
        };
        total = total.checked_add(amount.checked_mul(unit)?)?;
    }
    digits.is_empty().then(|| Duration::from_secs(total))
}

// =============================================================================
// CORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsProperties {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub exposed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime, in seconds.
    pub max_age: u64,
}

impl Default for CorsProperties {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: Vec::new(),
            allowed_headers: Vec::new(),
            exposed_headers: Vec::new(),
            allow_credentials: true,
            max_age: 3_600,
        }
    }
}

impl CorsProperties {
    fn from_lookup(env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let props = Self {
            allowed_origins: parse_list(env, "APP_SECURITY_ALLOWED_ORIGINS"),
            allowed_methods: parse_list(env, "APP_SECURITY_ALLOWED_METHODS"),
            allowed_headers: parse_list(env, "APP_SECURITY_ALLOWED_HEADERS"),
            exposed_headers: parse_list(env, "APP_SECURITY_EXPOSED_HEADERS"),
            allow_credentials: parse_flag(
                env,
                "APP_SECURITY_ALLOW_CREDENTIALS",
                d.allow_credentials,
            )?,
            max_age: parse_or(env, "APP_SECURITY_MAX_AGE", d.max_age)?,
        };
        // Fail at startup rather than on first request.
        props.layer()?;
        Ok(props)
    }

    /// Build the CORS layer, or `None` when no origin is allowed.
    ///
    /// A `*` entry with credentials enabled mirrors the request instead of
    /// sending a wildcard, which browsers reject.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable origins, methods
    /// or header names, and for `*` exposed headers with credentials.
    pub fn layer(&self) -> Result<Option<CorsLayer>, ConfigError> {
        if self.allowed_origins.is_empty() {
            return Ok(None);
        }

        let origin = if is_wildcard(&self.allowed_origins) {
            if self.allow_credentials {
                AllowOrigin::mirror_request()
            } else {
                AllowOrigin::any()
            }
        } else {
            let origins = self
                .allowed_origins
                .iter()
                .map(|o| HeaderValue::from_str(o))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| invalid("APP_SECURITY_ALLOWED_ORIGINS", &e))?;
            AllowOrigin::list(origins)
        };

        let methods = if self.allowed_methods.is_empty() {
            AllowMethods::list([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
        } else if is_wildcard(&self.allowed_methods) {
            if self.allow_credentials {
                AllowMethods::mirror_request()
            } else {
                AllowMethods::any()
            }
        } else {
            let methods = self
                .allowed_methods
                .iter()
                .map(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| invalid("APP_SECURITY_ALLOWED_METHODS", &e))?;
            AllowMethods::list(methods)
        };

        let headers = if self.allowed_headers.is_empty() {
            AllowHeaders::list([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
        } else if is_wildcard(&self.allowed_headers) {
            if self.allow_credentials {
                AllowHeaders::mirror_request()
            } else {
                AllowHeaders::any()
            }
        } else {
            AllowHeaders::list(header_names(
                &self.allowed_headers,
                "APP_SECURITY_ALLOWED_HEADERS",
            )?)
        };

        let mut layer = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(self.allow_credentials)
            .max_age(Duration::from_secs(self.max_age));

        if is_wildcard(&self.exposed_headers) {
            if self.allow_credentials {
                return Err(ConfigError::InvalidEnvVar(
                    "APP_SECURITY_EXPOSED_HEADERS".to_string(),
                    "'*' cannot be combined with allow-credentials".to_string(),
                ));
            }
            layer = layer.expose_headers(ExposeHeaders::any());
        } else if !self.exposed_headers.is_empty() {
            layer = layer.expose_headers(header_names(
                &self.exposed_headers,
                "APP_SECURITY_EXPOSED_HEADERS",
            )?);
        }

        Ok(Some(layer))
    }
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

fn header_names(values: &[String], key: &str) -> Result<Vec<HeaderName>, ConfigError> {
    values
        .iter()
        .map(|h| HeaderName::from_bytes(h.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(key, &e))
}

fn invalid(key: &str, err: &dyn std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::tests::lookup;

    #[test]
    fn test_defaults() {
        let props = SecurityProperties::from_lookup(&lookup(&[])).unwrap();
        assert_eq!(props, SecurityProperties::default());
        assert_eq!(props.password.min_length, 8);
        assert!(props.password.require_special_char);
        assert_eq!(props.login.max_attempts, 5);
        assert_eq!(props.login.lockout_duration, Duration::from_secs(1_800));
        assert!(props.cors.allow_credentials);
        assert_eq!(props.cors.max_age, 3_600);
        assert!(props.cors.layer().unwrap().is_none());
    }

    #[test]
    fn test_min_length_floor() {
        let env = lookup(&[("APP_SECURITY_PASSWORD_MIN_LENGTH", "5")]);
        assert!(SecurityProperties::from_lookup(&env).is_err());
        let env = lookup(&[("APP_SECURITY_PASSWORD_MIN_LENGTH", "6")]);
        assert_eq!(
            SecurityProperties::from_lookup(&env).unwrap().password.min_length,
            6
        );
    }

    #[test]
    fn test_password_policy() {
        let policy = PasswordPolicy::default();
        assert!(policy.check("Chantier#2024").is_ok());

        let problems = policy.check("short").unwrap_err();
        assert!(problems.iter().any(|p| p.contains("at least 8")));
        assert!(problems.iter().any(|p| p.contains("uppercase")));
        assert!(problems.iter().any(|p| p.contains("digit")));
        assert!(problems.iter().any(|p| p.contains("special")));
        assert!(!problems.iter().any(|p| p.contains("lowercase")));
    }

    #[test]
    fn test_relaxed_policy() {
        let policy = PasswordPolicy {
            min_length: 6,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special_char: false,
        };
        assert!(policy.check("cement").is_ok());
        assert!(policy.check("brick").is_err());
    }

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("30m"), Some(Duration::from_secs(1_800)));
        assert_eq!(parse_duration("45s"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("2h"), Some(Duration::from_secs(7_200)));
        assert_eq!(parse_duration("1d"), Some(Duration::from_secs(86_400)));
        assert_eq!(parse_duration("PT30M"), Some(Duration::from_secs(1_800)));
        assert_eq!(parse_duration("PT1H30M"), Some(Duration::from_secs(5_400)));
        assert_eq!(parse_duration("900"), Some(Duration::from_secs(900)));
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration("PT"), None);
        assert_eq!(parse_duration("PT30"), None);
        assert_eq!(parse_duration("10w"), None);
    }

    #[test]
    fn test_invalid_lockout_duration() {
        let env = lookup(&[("APP_SECURITY_LOGIN_LOCKOUT_DURATION", "forever")]);
        let err = SecurityProperties::from_lookup(&env).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "APP_SECURITY_LOGIN_LOCKOUT_DURATION")
        );
    }

    #[test]
    fn test_cors_layer_with_origins() {
        let env = lookup(&[
            ("APP_SECURITY_ALLOWED_ORIGINS", "https://bacoge.com,https://www.bacoge.com"),
            ("APP_SECURITY_ALLOWED_METHODS", "get,post"),
            ("APP_SECURITY_ALLOWED_HEADERS", "content-type,x-requested-with"),
            ("APP_SECURITY_EXPOSED_HEADERS", "x-total-count"),
        ]);
        let props = SecurityProperties::from_lookup(&env).unwrap();
        assert_eq!(props.cors.allowed_origins.len(), 2);
        assert!(props.cors.layer().unwrap().is_some());
    }

    #[test]
    fn test_cors_wildcard_rules() {
        let env = lookup(&[
            ("APP_SECURITY_ALLOWED_ORIGINS", "*"),
            ("APP_SECURITY_ALLOWED_HEADERS", "*"),
        ]);
        assert!(SecurityProperties::from_lookup(&env).is_ok());

        let env = lookup(&[
            ("APP_SECURITY_ALLOWED_ORIGINS", "*"),
            ("APP_SECURITY_EXPOSED_HEADERS", "*"),
        ]);
        assert!(SecurityProperties::from_lookup(&env).is_err());

        let env = lookup(&[
            ("APP_SECURITY_ALLOWED_ORIGINS", "*"),
            ("APP_SECURITY_EXPOSED_HEADERS", "*"),
            ("APP_SECURITY_ALLOW_CREDENTIALS", "false"),
        ]);
        assert!(SecurityProperties::from_lookup(&env).is_ok());
    }

    #[test]
    fn test_cors_invalid_header_name() {
        let env = lookup(&[
            ("APP_SECURITY_ALLOWED_ORIGINS", "https://bacoge.com"),
            ("APP_SECURITY_ALLOWED_HEADERS", "bad header"),
        ]);
        assert!(SecurityProperties::from_lookup(&env).is_err());
    }
}
