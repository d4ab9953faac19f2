//! `app.pagination.*` properties and page-request resolution.

use serde::Deserialize;

use super::{ConfigError, EnvLookup, parse_or};

/// Page size limits for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationProperties {
    /// Page size used when the client sends none (or 0).
    pub default_size: u32,
    /// Upper bound; larger requests are clamped.
    pub max_size: u32,
}

impl Default for PaginationProperties {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

impl PaginationProperties {
    pub(super) fn from_lookup(env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let props = Self {
            default_size: parse_or(env, "APP_PAGINATION_DEFAULT_SIZE", defaults.default_size)?,
            max_size: parse_or(env, "APP_PAGINATION_MAX_SIZE", defaults.max_size)?,
        };

        if props.default_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "APP_PAGINATION_DEFAULT_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if props.max_size < props.default_size {
            return Err(ConfigError::InvalidEnvVar(
                "APP_PAGINATION_MAX_SIZE".to_string(),
                format!("must be at least the default size ({})", props.default_size),
            ));
        }
        Ok(props)
    }

    /// Resolve a client page request against these limits.
    #[must_use]
    pub fn resolve(&self, request: PageRequest) -> Pagination {
        let size = match request.size {
            None | Some(0) => self.default_size,
            Some(n) => n.min(self.max_size),
        };
        let page = request.page.unwrap_or(0);
        Pagination { page, size }
    }
}

/// `?page=&size=` as sent by the client. Pages are zero-based.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Pagination {
    /// SQL `LIMIT`.
    #[must_use]
    pub fn limit(self) -> i64 {
        i64::from(self.size)
    }

    /// SQL `OFFSET`.
    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Number of pages needed for `total` rows.
    #[must_use]
    pub fn total_pages(self, total: i64) -> i64 {
        let size = i64::from(self.size.max(1));
        (total.max(0) + size - 1) / size
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::tests::lookup;

    #[test]
    fn test_defaults_when_unset() {
        let props = PaginationProperties::from_lookup(&lookup(&[])).unwrap();
        assert_eq!(props, PaginationProperties::default());
        assert_eq!(props.default_size, 20);
        assert_eq!(props.max_size, 100);
    }

    #[test]
    fn test_overrides() {
        let env = lookup(&[
            ("APP_PAGINATION_DEFAULT_SIZE", "50"),
            ("APP_PAGINATION_MAX_SIZE", "500"),
        ]);
        let props = PaginationProperties::from_lookup(&env).unwrap();
        assert_eq!(props.default_size, 50);
        assert_eq!(props.max_size, 500);
    }

    #[test]
    fn test_max_below_default_is_rejected() {
        let env = lookup(&[("APP_PAGINATION_MAX_SIZE", "10")]);
        assert!(PaginationProperties::from_lookup(&env).is_err());
        let env = lookup(&[("APP_PAGINATION_DEFAULT_SIZE", "0")]);
        assert!(PaginationProperties::from_lookup(&env).is_err());
    }

    #[test]
    fn test_resolve_applies_default_and_clamp() {
        let props = PaginationProperties::default();

        let p = props.resolve(PageRequest::default());
        assert_eq!(p, Pagination { page: 0, size: 20 });

        let p = props.resolve(PageRequest {
            page: Some(2),
            size: Some(0),
        });
        assert_eq!(p.size, 20);
        assert_eq!(p.offset(), 40);

        let p = props.resolve(PageRequest {
            page: Some(1),
            size: Some(1_000),
        });
        assert_eq!(p.size, 100);
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination { page: 0, size: 20 };
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(20), 1);
        assert_eq!(p.total_pages(21), 2);
    }
}
