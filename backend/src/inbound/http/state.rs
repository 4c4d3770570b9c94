//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on the services and stay testable with fake-backed wiring.

use crate::domain::services::{
    AccountService, BootcampService, CourseService, ReviewService, UserService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and credential flows.
    pub account: AccountService,
    /// Bootcamp resource rules.
    pub bootcamps: BootcampService,
    /// Course resource rules.
    pub courses: CourseService,
    /// Review resource rules.
    pub reviews: ReviewService,
    /// Admin user management.
    pub users: UserService,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}
