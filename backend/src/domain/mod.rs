//! Core business types, rules, and the ports adapters implement.
//!
//! Nothing in this module depends on HTTP or the database; the inbound and
//! outbound layers adapt to the traits and types declared here.

pub mod auth;
mod bootcamp;
mod course;
mod error;
pub mod geo;
pub mod ports;
mod review;
pub mod services;
mod slug;
mod user;
mod validation;

pub use bootcamp::{
    Bootcamp, BootcampSummary, Career, CreateBootcamp, Location, UpdateBootcamp, DEFAULT_PHOTO,
    DESCRIPTION_MAX, NAME_MAX, PHONE_MAX,
};
pub use course::{Course, CreateCourse, MinimumSkill, UpdateCourse};
pub use error::{Error, ErrorCode};
pub use review::{CreateReview, Review, UpdateReview, RATING_MAX, RATING_MIN, TITLE_MAX};
pub use slug::slugify;
pub use user::{AdminUpdateUser, RegisterUser, Role, UpdateUserDetails, User, PASSWORD_MIN};
pub use validation::{is_valid_email, is_valid_url, require_email};
