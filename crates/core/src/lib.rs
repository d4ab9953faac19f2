//! Bacoge Core - Shared types library.
//!
//! Types used by every Bacoge component:
//! - `admin` - Administration backend and dashboard
//! - `cli` - Migrations and admin user provisioning
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Enable the `postgres` feature to get `sqlx` encodings for IDs, emails and
//! status enums.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, validated emails and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
