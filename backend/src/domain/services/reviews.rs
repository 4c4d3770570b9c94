//! Review orchestration, including the rating aggregate carried by the
//! reviewed bootcamp.

use std::sync::Arc;

use chrono::Utc;
use listing::ListQuery;
use uuid::Uuid;

use crate::domain::ports::{BootcampRepository, ReviewListItem, ReviewRepository};
use crate::domain::{BootcampSummary, CreateReview, Error, Review, UpdateReview, User};

fn no_review(id: Uuid) -> Error {
    Error::not_found(format!("No review with the id of {id}"))
}

/// Review resource rules.
#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bootcamps: Arc<dyn BootcampRepository>,
}

impl ReviewService {
    /// Wire the service.
    #[must_use]
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        bootcamps: Arc<dyn BootcampRepository>,
    ) -> Self {
        Self { reviews, bootcamps }
    }

    /// One page of reviews plus the filtered total, optionally scoped to
    /// one bootcamp.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when a scope bootcamp does not exist.
    pub async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<ReviewListItem>, u64), Error> {
        if let Some(id) = bootcamp_id {
            self.require_bootcamp(id).await?;
        }
        Ok(self.reviews.list(query, bootcamp_id).await?)
    }

    /// A single review with its bootcamp's summary.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<ReviewListItem, Error> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| no_review(id))?;
        let bootcamp = self.require_bootcamp(review.bootcamp_id).await?;
        Ok(ReviewListItem { review, bootcamp })
    }

    /// Leave a review on a bootcamp, then refresh its average rating.
    ///
    /// One review per user per bootcamp.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] for a missing bootcamp,
    /// [`Error::invalid_request`] for a second review by the same author.
    pub async fn create(
        &self,
        actor: &User,
        bootcamp_id: Uuid,
        input: CreateReview,
    ) -> Result<Review, Error> {
        input.validate()?;
        self.require_bootcamp(bootcamp_id).await?;
        if self
            .reviews
            .find_by_author(bootcamp_id, actor.id)
            .await?
            .is_some()
        {
            return Err(Error::invalid_request(
                "You have already submitted a review for this bootcamp",
            ));
        }

        let review = Review {
            id: Uuid::new_v4(),
            title: input.trimmed_title().to_owned(),
            text: input.text.clone(),
            rating: input.rating,
            bootcamp_id,
            user_id: actor.id,
            created_at: Utc::now(),
        };
        self.reviews.insert(&review).await?;
        self.refresh_average_rating(bootcamp_id).await;
        Ok(review)
    }

    /// Apply a partial update, then refresh the bootcamp's average rating.
    ///
    /// # Errors
    ///
    /// [`Error::forbidden`] unless `actor` wrote the review or is admin.
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        input: UpdateReview,
    ) -> Result<Review, Error> {
        input.validate()?;
        let mut review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| no_review(id))?;
        if !actor.may_modify(review.user_id) {
            return Err(Error::forbidden("Not authorized to update review"));
        }

        if let Some(title) = input.title {
            review.title = title.trim().to_owned();
        }
        if let Some(text) = input.text {
            review.text = text;
        }
        if let Some(rating) = input.rating {
            review.rating = rating;
        }

        self.reviews.update(&review).await?;
        self.refresh_average_rating(review.bootcamp_id).await;
        Ok(review)
    }

    /// Delete a review, then refresh the bootcamp's average rating.
    ///
    /// # Errors
    ///
    /// [`Error::forbidden`] unless `actor` wrote the review or is admin.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), Error> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| no_review(id))?;
        if !actor.may_modify(review.user_id) {
            return Err(Error::forbidden("Not authorized to delete review"));
        }
        if !self.reviews.delete(id).await? {
            return Err(no_review(id));
        }
        self.refresh_average_rating(review.bootcamp_id).await;
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
    async fn refresh_average_rating(&self, bootcamp_id: Uuid) {
        if let Err(err) = self.reviews.recompute_average_rating(bootcamp_id).await {
            tracing::warn!(error = %err, bootcamp_id = %bootcamp_id, "average rating refresh failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::fakes::{FakeBootcampRepo, FakeReviewRepo, FakeStore};
    use crate::domain::{Bootcamp, Career, ErrorCode, Location, Role, DEFAULT_PHOTO};

    fn actor(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: None,
            email: "ada@example.com".into(),
            role,
            password_hash: "digest".into(),
            reset_password_token_hash: None,
            reset_password_expires_at: None,
            created_at: Utc::now(),
        }
    }

    fn seeded_bootcamp(store: &FakeStore) -> Bootcamp {
        let bootcamp = Bootcamp {
            id: Uuid::new_v4(),
            name: "Devworks".into(),
            slug: "devworks".into(),
            description: "Full stack development".into(),
            website: None,
            phone: None,
            email: None,
            location: Location {
                kind: "Point",
                coordinates: [-71.1054, 42.3505],
                formatted_address: None,
                street: None,
                city: None,
                state: None,
                zipcode: None,
                country: None,
            },
            careers: vec![Career::WebDevelopment],
            average_rating: None,
            average_cost: None,
            photo: DEFAULT_PHOTO.to_owned(),
            housing: false,
            job_assistance: false,
            job_guarantee: false,
            accept_gi: false,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        store.seed_bootcamp(bootcamp.clone());
        bootcamp
    }

    fn review_input(rating: i32) -> CreateReview {
        CreateReview {
            title: "Learned a ton".into(),
            text: "Great instructors".into(),
            rating,
        }
    }

    fn service(store: &Arc<FakeStore>) -> ReviewService {
        ReviewService::new(
            Arc::new(FakeReviewRepo::new(store.clone())),
            Arc::new(FakeBootcampRepo::new(store.clone())),
        )
    }

    #[actix_rt::test]
    async fn reviews_refresh_the_average_rating() {
        let store = Arc::new(FakeStore::default());
        let bootcamp = seeded_bootcamp(&store);
        let svc = service(&store);

        svc.create(&actor(Role::User), bootcamp.id, review_input(8))
            .await
            .unwrap();
        svc.create(&actor(Role::User), bootcamp.id, review_input(9))
            .await
            .unwrap();

        assert_eq!(store.bootcamp(bootcamp.id).unwrap().average_rating, Some(8.5));
    }

    #[actix_rt::test]
    async fn a_second_review_by_the_same_author_is_rejected() {
        let store = Arc::new(FakeStore::default());
        let bootcamp = seeded_bootcamp(&store);
        let svc = service(&store);
        let author = actor(Role::User);

        svc.create(&author, bootcamp.id, review_input(8))
            .await
            .unwrap();
        let err = svc
            .create(&author, bootcamp.id, review_input(9))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[actix_rt::test]
    async fn deleting_the_last_review_clears_the_average() {
        let store = Arc::new(FakeStore::default());
        let bootcamp = seeded_bootcamp(&store);
        let svc = service(&store);
        let author = actor(Role::User);

        let review = svc
            .create(&author, bootcamp.id, review_input(7))
            .await
            .unwrap();
        assert_eq!(store.bootcamp(bootcamp.id).unwrap().average_rating, Some(7.0));

        svc.delete(&author, review.id).await.unwrap();
        assert_eq!(store.bootcamp(bootcamp.id).unwrap().average_rating, None);
    }

    #[actix_rt::test]
    async fn only_the_author_or_admin_may_modify_a_review() {
        let store = Arc::new(FakeStore::default());
        let bootcamp = seeded_bootcamp(&store);
        let svc = service(&store);
        let author = actor(Role::User);
        let review = svc
            .create(&author, bootcamp.id, review_input(6))
            .await
            .unwrap();

        let stranger = actor(Role::User);
        let update = UpdateReview {
            rating: Some(10),
            ..UpdateReview::default()
        };
        let err = svc
            .update(&stranger, review.id, update.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let admin = actor(Role::Admin);
        let updated = svc.update(&admin, review.id, update).await.unwrap();
        assert_eq!(updated.rating, 10);
        assert_eq!(store.bootcamp(bootcamp.id).unwrap().average_rating, Some(10.0));
    }

    #[actix_rt::test]
    async fn reviewing_a_missing_bootcamp_is_not_found() {
        let store = Arc::new(FakeStore::default());
        let svc = service(&store);
        let err = svc
            .create(&actor(Role::User), Uuid::new_v4(), review_input(5))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
