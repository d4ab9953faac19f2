//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first, see `main.rs`)
//!
//! 1. CORS, when origins are configured
//! 2. Sentry layers (hub per request, HTTP context)
//! 3. `TraceLayer` (request span with status and latency)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Body size limit
//!
//! Authentication is enforced per handler with the extractors in [`auth`].

pub mod auth;
pub mod session;

pub use auth::{
    API_PREFIX, AdminAuthRejection, LOGIN_PATH, OptionalAdminAuth, RequireAdminAuth,
    clear_current_admin, set_current_admin,
};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
