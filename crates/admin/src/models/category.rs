//! Product categories.

use bacoge_core::{CategoryId, CategoryStatus};
use chrono::{DateTime, Utc};

/// Font Awesome icon used when a category has none.
pub const DEFAULT_ICON: &str = "fa-box";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub icon: String,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: CategoryStatus,
}
