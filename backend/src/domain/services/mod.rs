//! Application services: orchestration of repositories and collaborators.
//!
//! Each service owns the business rules for one resource family. Handlers
//! stay thin; everything testable against in-memory fakes lives here.

mod account;
mod bootcamps;
mod courses;
mod reviews;
mod users;

pub use account::AccountService;
pub use bootcamps::{BootcampService, PhotoUpload};
pub use courses::CourseService;
pub use reviews::ReviewService;
pub use users::UserService;

#[cfg(test)]
pub(crate) mod fakes;
