//! HTTP inbound adapter exposing the REST endpoints.

pub mod account;
pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod error;
pub mod respond;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use actix_web::web;

/// Register every REST route under `/api/v1`.
///
/// Used by both the server and the handler tests so the two cannot drift.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(account::register)
            .service(account::login)
            .service(account::logout)
            .service(account::current_user)
            .service(account::update_details)
            .service(account::update_password)
            .service(account::forgot_password)
            .service(account::reset_password)
            .service(bootcamps::bootcamps_in_radius)
            .service(bootcamps::list_bootcamps)
            .service(bootcamps::get_bootcamp)
            .service(bootcamps::create_bootcamp)
            .service(bootcamps::update_bootcamp)
            .service(bootcamps::delete_bootcamp)
            .service(bootcamps::upload_bootcamp_photo)
            .service(courses::list_bootcamp_courses)
            .service(courses::create_course)
            .service(courses::list_courses)
            .service(courses::get_course)
            .service(courses::update_course)
            .service(courses::delete_course)
            .service(reviews::list_bootcamp_reviews)
            .service(reviews::create_review)
            .service(reviews::list_reviews)
            .service(reviews::get_review)
            .service(reviews::update_review)
            .service(reviews::delete_review)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::create_user)
            .service(users::update_user)
            .service(users::delete_user),
    );
}
