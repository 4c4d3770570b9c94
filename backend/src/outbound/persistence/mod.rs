//! Diesel-backed persistence adapters.
//!
//! One repository per aggregate, all sharing the async connection pool.
//! List queries interpret the typed filter/sort input against per-entity
//! column whitelists; anything outside the whitelist is rejected rather
//! than silently ignored.

mod diesel_bootcamp_repository;
mod diesel_course_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod error;
mod filters;
mod models;
mod pool;
pub mod schema;
mod summary;

pub use diesel_bootcamp_repository::DieselBootcampRepository;
pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use error::map_diesel_error;
pub use pool::{DbPool, PoolConfig, PoolError};
