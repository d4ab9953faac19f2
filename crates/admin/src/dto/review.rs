use bacoge_core::ReviewStatus;
use serde::Deserialize;

/// `PATCH /admin/api/reviews/{id}/status` body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReviewStatusRequest {
    pub status: ReviewStatus,
}
