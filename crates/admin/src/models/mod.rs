//! Domain models for admin.
//!
//! Plain data loaded by the repositories in [`crate::db`]. Lifecycle rules
//! that used to live in persistence hooks are explicit methods here (see
//! [`Address::prepare_insert`]).

pub mod address;
pub mod category;
pub mod message;
pub mod order;
pub mod promotion;
pub mod review;
pub mod session;
pub mod user;

pub use address::{Address, AddressError};
pub use category::{Category, CategoryDraft};
pub use message::Message;
pub use order::{Order, OrderItem};
pub use promotion::Promotion;
pub use review::Review;
pub use session::{CurrentAdmin, keys as session_keys};
pub use user::{NewUser, User, UserCredentials};
