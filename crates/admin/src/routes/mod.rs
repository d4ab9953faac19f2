//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check (main.rs)
//! GET  /health/ready                        - Database readiness (main.rs)
//!
//! # Dashboard
//! GET  /admin                               - Redirect to dashboard
//! GET  /admin/dashboard                     - Dashboard overview
//! GET  /admin/dashboard/{*rest}             - Redirect to dashboard
//!
//! # Auth (email + password, admin role only)
//! GET  /admin/login                         - Login page
//! POST /admin/login                         - Check credentials, open session
//! POST /admin/logout                        - Close session
//!
//! # JSON API
//! GET    /admin/api/categories              - Paged categories
//! POST   /admin/api/categories              - Create category
//! GET    /admin/api/categories/{id}         - Category detail
//! PUT    /admin/api/categories/{id}         - Update category
//! DELETE /admin/api/categories/{id}         - Delete category
//! POST   /admin/api/categories/{id}/image   - Upload category image
//! GET    /admin/api/addresses               - Paged addresses (?userId=)
//! POST   /admin/api/addresses               - Create address
//! GET    /admin/api/addresses/stats         - Address counters
//! GET    /admin/api/addresses/{id}          - Address detail
//! PUT    /admin/api/addresses/{id}          - Update address
//! DELETE /admin/api/addresses/{id}          - Delete address
//! GET    /admin/api/promotions              - Paged promotions (?status=)
//! GET    /admin/api/promotions/stats        - Promotion counters
//! GET    /admin/api/reviews/stats           - Review counters
//! PATCH  /admin/api/reviews/{id}/status     - Moderate review
//! GET    /admin/api/users                   - Paged users
//! GET    /admin/api/users/report            - Registration report
//! GET    /admin/api/users/{id}              - User detail
//! GET    /admin/api/orders/chart            - Orders per day and status
//! GET    /admin/api/orders/{id}/items       - Order line items
//! GET    /admin/api/products/top-selling    - Best sellers
//! GET    /admin/api/conversations/{id}/messages - Conversation messages
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

/// Build every admin route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(|| async { Redirect::to(dashboard::DASHBOARD_PATH) }))
        .merge(dashboard::router())
        .merge(auth::router())
        .merge(api::router())
}
