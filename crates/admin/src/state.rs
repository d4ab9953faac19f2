//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::{
    DashboardService, LoginAttempts, PgDashboardService, PgPromotionService, PromotionService,
};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    dashboard: Arc<dyn DashboardService>,
    promotions: Arc<dyn PromotionService>,
    login_attempts: LoginAttempts,
}

impl AppState {
    /// State wired to the `PostgreSQL`-backed services.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let dashboard = Arc::new(PgDashboardService::new(pool.clone()));
        let promotions = Arc::new(PgPromotionService::new(pool.clone()));
        Self::with_services(config, pool, dashboard, promotions)
    }

    /// State with caller-supplied services.
    #[must_use]
    pub fn with_services(
        config: AdminConfig,
        pool: PgPool,
        dashboard: Arc<dyn DashboardService>,
        promotions: Arc<dyn PromotionService>,
    ) -> Self {
        let login_attempts = LoginAttempts::new(&config.security.login);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                dashboard,
                promotions,
                login_attempts,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn dashboard(&self) -> &dyn DashboardService {
        self.inner.dashboard.as_ref()
    }

    #[must_use]
    pub fn promotions(&self) -> &dyn PromotionService {
        self.inner.promotions.as_ref()
    }

    #[must_use]
    pub fn login_attempts(&self) -> &LoginAttempts {
        &self.inner.login_attempts
    }
}
