use async_trait::async_trait;
use listing::ListQuery;
use uuid::Uuid;

use super::StoreError;
use crate::domain::{BootcampSummary, Review};

/// A review joined with its bootcamp's summary for listing responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewListItem {
    /// The review row.
    pub review: Review,
    /// Name and description of the reviewed bootcamp.
    pub bootcamp: BootcampSummary,
}

/// Persistence operations for reviews, including the rating aggregate the
/// reviewed bootcamp carries.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a new review.
    async fn insert(&self, review: &Review) -> Result<(), StoreError>;

    /// Look up a review by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError>;

    /// The review `user_id` left on `bootcamp_id`, if any. Enforces the
    /// one-review-per-user-per-bootcamp rule.
    async fn find_by_author(
        &self,
        bootcamp_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, StoreError>;

    /// Write back a modified review.
    async fn update(&self, review: &Review) -> Result<(), StoreError>;

    /// Delete a review; `false` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// List reviews per `query`, optionally scoped to one bootcamp, with the
    /// reviewed bootcamp's summary joined in. Returns the page and the
    /// filtered total.
    async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<ReviewListItem>, u64), StoreError>;

    /// Recompute the bootcamp's average rating from its current reviews,
    /// store it, and return the stored value. `None` when the bootcamp has
    /// no reviews left.
    async fn recompute_average_rating(
        &self,
        bootcamp_id: Uuid,
    ) -> Result<Option<f64>, StoreError>;
}
