//! Course orchestration, including the tuition aggregate carried by the
//! owning bootcamp.

use std::sync::Arc;

use chrono::Utc;
use listing::ListQuery;
use uuid::Uuid;

use crate::domain::ports::{BootcampRepository, CourseListItem, CourseRepository};
use crate::domain::{BootcampSummary, Course, CreateCourse, Error, UpdateCourse, User};

fn no_course(id: Uuid) -> Error {
    Error::not_found(format!("No course with the id of {id}"))
}

/// Course resource rules.
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    bootcamps: Arc<dyn BootcampRepository>,
}

impl CourseService {
    /// Wire the service.
    #[must_use]
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        bootcamps: Arc<dyn BootcampRepository>,
    ) -> Self {
        Self { courses, bootcamps }
    }

    /// One page of courses plus the filtered total, optionally scoped to
    /// one bootcamp.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when a scope bootcamp does not exist.
    pub async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<CourseListItem>, u64), Error> {
        if let Some(id) = bootcamp_id {
            self.require_bootcamp(id).await?;
        }
        Ok(self.courses.list(query, bootcamp_id).await?)
    }

    /// A single course with its bootcamp's summary.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<CourseListItem, Error> {
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| no_course(id))?;
        let bootcamp = self.require_bootcamp(course.bootcamp_id).await?;
        Ok(CourseListItem { course, bootcamp })
    }

    /// Add a course to a bootcamp `actor` controls, then refresh the
    /// bootcamp's average cost.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] for a missing bootcamp, [`Error::forbidden`]
    /// for non-owners.
    pub async fn create(
        &self,
        actor: &User,
        bootcamp_id: Uuid,
        input: CreateCourse,
    ) -> Result<Course, Error> {
        input.validate()?;
        let bootcamp = self
            .bootcamps
            .find_by_id(bootcamp_id)
            .await?
            .ok_or_else(|| {
                Error::not_found(format!("No bootcamp with the id of {bootcamp_id}"))
            })?;
        if !actor.may_modify(bootcamp.user_id) {
            return Err(Error::forbidden(format!(
                "User {} is not authorized to add a course to bootcamp {bootcamp_id}",
                actor.id
            )));
        }

        let course = Course {
            id: Uuid::new_v4(),
            title: input.trimmed_title().to_owned(),
            description: input.description.clone(),
            weeks: input.weeks,
            tuition: input.tuition,
            minimum_skill: input.minimum_skill,
            scholarship_available: input.scholarship_available,
            bootcamp_id,
            user_id: actor.id,
            created_at: Utc::now(),
        };
        self.courses.insert(&course).await?;
        self.refresh_average_cost(bootcamp_id).await;
        Ok(course)
    }

    /// Apply a partial update, then refresh the bootcamp's average cost.
    ///
    /// # Errors
    ///
    /// [`Error::forbidden`] unless `actor` owns the course or is admin.
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        input: UpdateCourse,
    ) -> Result<Course, Error> {
        input.validate()?;
        let mut course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| no_course(id))?;
        if !actor.may_modify(course.user_id) {
            return Err(Error::forbidden(format!(
                "User {} is not authorized to update course {id}",
                actor.id
            )));
        }

        if let Some(title) = input.title {
            course.title = title.trim().to_owned();
        }
        if let Some(description) = input.description {
            course.description = description;
        }
        if let Some(weeks) = input.weeks {
            course.weeks = weeks;
        }
        if let Some(tuition) = input.tuition {
            course.tuition = tuition;
        }
        if let Some(minimum_skill) = input.minimum_skill {
            course.minimum_skill = minimum_skill;
        }
        if let Some(scholarship_available) = input.scholarship_available {
            course.scholarship_available = scholarship_available;
        }

        self.courses.update(&course).await?;
        self.refresh_average_cost(course.bootcamp_id).await;
        Ok(course)
    }

    /// Delete a course, then refresh the bootcamp's average cost.
    ///
    /// # Errors
    ///
    /// [`Error::forbidden`] unless `actor` owns the course or is admin.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), Error> {
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| no_course(id))?;
        if !actor.may_modify(course.user_id) {
            return Err(Error::forbidden(format!(
                "User {} is not authorized to delete course {id}",
                actor.id
            )));
        }
        if !self.courses.delete(id).await? {
            return Err(no_course(id));
        }
        self.refresh_average_cost(course.bootcamp_id).await;
        Ok(())
    }

    async fn require_bootcamp(&self, id: Uuid) -> Result<BootcampSummary, Error> {
        self.bootcamps
            .find_by_id(id)
            .await?
            .map(|b| BootcampSummary {
                id: b.id,
                name: b.name,
                description: b.description,
            })
            .ok_or_else(|| Error::not_found(format!("No bootcamp with the id of {id}")))
    }

    /// The aggregate is advisory; a failed refresh must not fail the
    /// mutation that triggered it.
    async fn refresh_average_cost(&self, bootcamp_id: Uuid) {
        if let Err(err) = self.courses.recompute_average_cost(bootcamp_id).await {
            tracing::warn!(error = %err, bootcamp_id = %bootcamp_id, "average cost refresh failed");
        }
    }
}
