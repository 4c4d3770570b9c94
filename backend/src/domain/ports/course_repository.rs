use async_trait::async_trait;
use listing::ListQuery;
use uuid::Uuid;

use super::StoreError;
use crate::domain::{BootcampSummary, Course};

/// A course joined with its bootcamp's summary for listing responses.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseListItem {
    /// The course row.
    pub course: Course,
    /// Name and description of the owning bootcamp.
    pub bootcamp: BootcampSummary,
}

/// Persistence operations for courses, including the tuition aggregate the
/// owning bootcamp carries.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist a new course.
    async fn insert(&self, course: &Course) -> Result<(), StoreError>;

    /// Look up a course by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, StoreError>;

    /// Write back a modified course.
    async fn update(&self, course: &Course) -> Result<(), StoreError>;

    /// Delete a course; `false` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// List courses per `query`, optionally scoped to one bootcamp, with the
    /// owning bootcamp's summary joined in. Returns the page and the
    /// filtered total.
    async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<CourseListItem>, u64), StoreError>;

    /// Recompute the bootcamp's average tuition from its current courses,
    /// store it (rounded up to the next multiple of ten), and return the
    /// stored value. `None` when the bootcamp has no courses left.
    async fn recompute_average_cost(&self, bootcamp_id: Uuid)
        -> Result<Option<f64>, StoreError>;
}
