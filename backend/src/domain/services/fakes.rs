//! In-memory port implementations for service and handler tests.
//!
//! A [`FakeStore`] plays the database: all four collections live behind one
//! struct so cascade deletes and aggregate writes are observable across
//! repositories, the way they are against the real store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use listing::ListQuery;
use uuid::Uuid;

use crate::domain::ports::{
    BootcampRepository, CourseListItem, CourseRepository, GeocodeError, GeocodedAddress, Geocoder,
    MailError, Mailer, PhotoStore, PhotoStoreError, ReviewListItem, ReviewRepository, StoreError,
    UserRepository,
};
use crate::domain::{Bootcamp, BootcampSummary, Course, Review, User};

fn paginate<T: Clone>(items: &[T], query: &ListQuery) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
    let page = items
        .iter()
        .skip(skip)
        .take(query.limit as usize)
        .cloned()
        .collect();
    (page, total)
}

/// Shared backing state for every fake repository.
#[derive(Default)]
pub struct FakeStore {
    users: Mutex<Vec<User>>,
    bootcamps: Mutex<Vec<Bootcamp>>,
    courses: Mutex<Vec<Course>>,
    reviews: Mutex<Vec<Review>>,
}

impl FakeStore {
    pub fn seed_bootcamp(&self, bootcamp: Bootcamp) {
        self.bootcamps.lock().unwrap().push(bootcamp);
    }

    pub fn seed_course(&self, course: Course) {
        self.courses.lock().unwrap().push(course);
    }

    pub fn seed_review(&self, review: Review) {
        self.reviews.lock().unwrap().push(review);
    }

    pub fn bootcamp(&self, id: Uuid) -> Option<Bootcamp> {
        self.bootcamps.lock().unwrap().iter().find(|b| b.id == id).cloned()
    }

    pub fn course_count(&self, bootcamp_id: Uuid) -> usize {
        self.courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.bootcamp_id == bootcamp_id)
            .count()
    }

    pub fn review_count(&self, bootcamp_id: Uuid) -> usize {
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.bootcamp_id == bootcamp_id)
            .count()
    }

    fn summary(&self, bootcamp_id: Uuid) -> Option<BootcampSummary> {
        self.bootcamp(bootcamp_id).map(|b| BootcampSummary {
            id: b.id,
            name: b.name,
            description: b.description,
        })
    }
}

/// User collection over a shared [`FakeStore`].
#[derive(Clone)]
pub struct FakeUserRepo {
    store: Arc<FakeStore>,
}

impl Default for FakeUserRepo {
    fn default() -> Self {
        Self::new(Arc::new(FakeStore::default()))
    }
}

impl FakeUserRepo {
    pub fn new(store: Arc<FakeStore>) -> Self {
        Self { store }
    }

    pub fn by_email(&self, email: &str) -> Option<User> {
        self.store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Shift a stored reset-token expiry into the past by `age`.
    pub fn age_reset_token(&self, email: &str, age: Duration) {
        let mut users = self.store.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            if let Some(expires_at) = user.reset_password_expires_at.as_mut() {
                *expires_at -= age;
            }
        }
    }
}

#[async_trait]
impl UserRepository for FakeUserRepo {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.store.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::duplicate("email"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.by_email(email))
    }

    async fn find_by_reset_hash(&self, hash: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .store
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.reset_password_token_hash.as_deref() == Some(hash))
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.store.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::duplicate("email"));
        }
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(StoreError::query("no such user")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.store.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list(&self, query: &ListQuery) -> Result<(Vec<User>, u64), StoreError> {
        Ok(paginate(&self.store.users.lock().unwrap(), query))
    }
}

/// Bootcamp collection over a shared [`FakeStore`].
#[derive(Clone)]
pub struct FakeBootcampRepo {
    store: Arc<FakeStore>,
}

impl FakeBootcampRepo {
    pub fn new(store: Arc<FakeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BootcampRepository for FakeBootcampRepo {
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), StoreError> {
        let mut bootcamps = self.store.bootcamps.lock().unwrap();
        if bootcamps.iter().any(|b| b.name == bootcamp.name) {
            return Err(StoreError::duplicate("name"));
        }
        bootcamps.push(bootcamp.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, StoreError> {
        Ok(self.store.bootcamp(id))
    }

    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Bootcamp>, StoreError> {
        Ok(self
            .store
            .bootcamps
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.user_id == user_id)
            .cloned())
    }

    async fn update(&self, bootcamp: &Bootcamp) -> Result<(), StoreError> {
        let mut bootcamps = self.store.bootcamps.lock().unwrap();
        match bootcamps.iter_mut().find(|b| b.id == bootcamp.id) {
            Some(slot) => {
                *slot = bootcamp.clone();
                Ok(())
            }
            None => Err(StoreError::query("no such bootcamp")),
        }
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut bootcamps = self.store.bootcamps.lock().unwrap();
        let before = bootcamps.len();
        bootcamps.retain(|b| b.id != id);
        if bootcamps.len() == before {
            return Ok(false);
        }
        self.store
            .courses
            .lock()
            .unwrap()
            .retain(|c| c.bootcamp_id != id);
        self.store
            .reviews
            .lock()
            .unwrap()
            .retain(|r| r.bootcamp_id != id);
        Ok(true)
    }

    async fn list(&self, query: &ListQuery) -> Result<(Vec<Bootcamp>, u64), StoreError> {
        Ok(paginate(&self.store.bootcamps.lock().unwrap(), query))
    }

    async fn find_within_box(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Result<Vec<Bootcamp>, StoreError> {
        Ok(self
            .store
            .bootcamps
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                let (lat, lng) = (b.location.latitude(), b.location.longitude());
                (min_lat..=max_lat).contains(&lat) && (min_lng..=max_lng).contains(&lng)
            })
            .cloned()
            .collect())
    }
}

fn ceil_to_ten(value: f64) -> f64 {
    (value / 10.0).ceil() * 10.0
}

/// Course collection over a shared [`FakeStore`].
#[derive(Clone)]
pub struct FakeCourseRepo {
    store: Arc<FakeStore>,
}

impl FakeCourseRepo {
    pub fn new(store: Arc<FakeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CourseRepository for FakeCourseRepo {
    async fn insert(&self, course: &Course) -> Result<(), StoreError> {
        let mut courses = self.store.courses.lock().unwrap();
        if courses.iter().any(|c| c.title == course.title) {
            return Err(StoreError::duplicate("title"));
        }
        courses.push(course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, StoreError> {
        Ok(self
            .store
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update(&self, course: &Course) -> Result<(), StoreError> {
        let mut courses = self.store.courses.lock().unwrap();
        match courses.iter_mut().find(|c| c.id == course.id) {
            Some(slot) => {
                *slot = course.clone();
                Ok(())
            }
            None => Err(StoreError::query("no such course")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut courses = self.store.courses.lock().unwrap();
        let before = courses.len();
        courses.retain(|c| c.id != id);
        Ok(courses.len() < before)
    }

    async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<CourseListItem>, u64), StoreError> {
        let courses: Vec<Course> = self
            .store
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| bootcamp_id.is_none_or(|id| c.bootcamp_id == id))
            .cloned()
            .collect();
        let (page, total) = paginate(&courses, query);
        let items = page
            .into_iter()
            .filter_map(|course| {
                let bootcamp = self.store.summary(course.bootcamp_id)?;
                Some(CourseListItem { course, bootcamp })
            })
            .collect();
        Ok((items, total))
    }

    async fn recompute_average_cost(
        &self,
        bootcamp_id: Uuid,
    ) -> Result<Option<f64>, StoreError> {
        let tuitions: Vec<f64> = self
            .store
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.bootcamp_id == bootcamp_id)
            .map(|c| c.tuition)
            .collect();
        let average = if tuitions.is_empty() {
            None
        } else {
            Some(ceil_to_ten(
                tuitions.iter().sum::<f64>() / tuitions.len() as f64,
            ))
        };
        if let Some(bootcamp) = self.store.bootcamps.lock().unwrap().iter_mut().find(|b| b.id == bootcamp_id) {
            bootcamp.average_cost = average;
        }
        Ok(average)
    }
}

/// Review collection over a shared [`FakeStore`].
#[derive(Clone)]
pub struct FakeReviewRepo {
    store: Arc<FakeStore>,
}

impl FakeReviewRepo {
    pub fn new(store: Arc<FakeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReviewRepository for FakeReviewRepo {
    async fn insert(&self, review: &Review) -> Result<(), StoreError> {
        self.store.reviews.lock().unwrap().push(review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        Ok(self
            .store
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_author(
        &self,
        bootcamp_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        Ok(self
            .store
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.bootcamp_id == bootcamp_id && r.user_id == user_id)
            .cloned())
    }

    async fn update(&self, review: &Review) -> Result<(), StoreError> {
        let mut reviews = self.store.reviews.lock().unwrap();
        match reviews.iter_mut().find(|r| r.id == review.id) {
            Some(slot) => {
                *slot = review.clone();
                Ok(())
            }
            None => Err(StoreError::query("no such review")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut reviews = self.store.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        Ok(reviews.len() < before)
    }

    async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<ReviewListItem>, u64), StoreError> {
        let reviews: Vec<Review> = self
            .store
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| bootcamp_id.is_none_or(|id| r.bootcamp_id == id))
            .cloned()
            .collect();
        let (page, total) = paginate(&reviews, query);
        let items = page
            .into_iter()
            .filter_map(|review| {
                let bootcamp = self.store.summary(review.bootcamp_id)?;
                Some(ReviewListItem { review, bootcamp })
            })
            .collect();
        Ok((items, total))
    }

    async fn recompute_average_rating(
        &self,
        bootcamp_id: Uuid,
    ) -> Result<Option<f64>, StoreError> {
        let ratings: Vec<i32> = self
            .store
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.bootcamp_id == bootcamp_id)
            .map(|r| r.rating)
            .collect();
        let average = if ratings.is_empty() {
            None
        } else {
            Some(f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64)
        };
        if let Some(bootcamp) = self.store.bootcamps.lock().unwrap().iter_mut().find(|b| b.id == bootcamp_id) {
            bootcamp.average_rating = average;
        }
        Ok(average)
    }
}

/// A recorded outbound message.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records messages, optionally failing every send.
#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<SentMail>>,
    failing: bool,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn last(&self) -> Option<SentMail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.failing {
            return Err(MailError {
                message: "smtp refused".into(),
            });
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        });
        Ok(())
    }
}

/// Geocoder that resolves every address to one fixed point.
pub struct FakeGeocoder {
    result: GeocodedAddress,
}

impl FakeGeocoder {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            result: GeocodedAddress {
                latitude,
                longitude,
                formatted_address: Some("233 Bay State Rd, Boston, MA 02215, US".into()),
                street: Some("233 Bay State Rd".into()),
                city: Some("Boston".into()),
                state: Some("MA".into()),
                zipcode: Some("02215".into()),
                country: Some("US".into()),
            },
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::NotFound {
                query: address.into(),
            });
        }
        Ok(self.result.clone())
    }
}

/// Photo store that records filenames and sizes.
#[derive(Default)]
pub struct FakePhotoStore {
    stored: Mutex<Vec<(String, usize)>>,
}

impl FakePhotoStore {
    pub fn last(&self) -> Option<(String, usize)> {
        self.stored.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PhotoStore for FakePhotoStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        self.stored
            .lock()
            .unwrap()
            .push((filename.into(), bytes.len()));
        Ok(())
    }
}
