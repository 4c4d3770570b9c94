use async_trait::async_trait;
use listing::ListQuery;
use uuid::Uuid;

use super::StoreError;
use crate::domain::Bootcamp;

/// Persistence operations for bootcamps.
#[async_trait]
pub trait BootcampRepository: Send + Sync {
    /// Persist a new bootcamp.
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), StoreError>;

    /// Look up a bootcamp by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, StoreError>;

    /// The bootcamp owned by `user_id`, if any. Used to enforce the
    /// one-bootcamp-per-publisher rule.
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Bootcamp>, StoreError>;

    /// Write back a modified bootcamp.
    async fn update(&self, bootcamp: &Bootcamp) -> Result<(), StoreError>;

    /// Delete a bootcamp together with its courses and reviews in a single
    /// transaction; `false` when no row matched.
    async fn delete_cascading(&self, id: Uuid) -> Result<bool, StoreError>;

    /// List bootcamps per `query`, returning the page and the filtered total.
    async fn list(&self, query: &ListQuery) -> Result<(Vec<Bootcamp>, u64), StoreError>;

    /// Bootcamps whose point falls inside a latitude/longitude bounding box.
    /// The caller refines the box to a circle.
    async fn find_within_box(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Result<Vec<Bootcamp>, StoreError>;
}
