//! JSON API route handlers for admin.
//!
//! Everything here lives under `/admin/api`, requires the admin role and
//! answers errors with the JSON envelope.

pub mod addresses;
pub mod categories;
pub mod conversations;
pub mod orders;
pub mod promotions;
pub mod reviews;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(categories::router())
        .merge(addresses::router())
        .merge(promotions::router())
        .merge(reviews::router())
        .merge(users::router())
        .merge(orders::router())
        .merge(conversations::router())
}
