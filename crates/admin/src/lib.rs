//! Bacoge Admin library.
//!
//! Back office of the Bacoge construction-materials store: the dashboard,
//! admin login and the `/admin/api` JSON endpoints. Exposed as a library so
//! the router can be exercised from integration tests.
//!
//! # Security
//!
//! Every page and endpoint except `/admin/login` and the health checks
//! requires a session whose user has the `ADMIN` role.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod extract;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
