//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST API. It
//! registers every HTTP endpoint from the inbound layer, the request payload
//! schemas, and the two authentication schemes (Bearer token and the `token`
//! cookie). Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AdminUpdateUser, BootcampSummary, Career, CreateBootcamp, CreateCourse, CreateReview,
    MinimumSkill, RegisterUser, Role, UpdateBootcamp, UpdateCourse, UpdateReview,
    UpdateUserDetails,
};
use crate::inbound::http::account::{
    ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, UpdatePasswordRequest,
};
use crate::inbound::http::error::ErrorBody;

/// Enrich the generated document with both token transport schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "TokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "Session token issued by the register and login endpoints.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campfinder API",
        description = "Bootcamp directory: bootcamps, courses, reviews, and accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = []), ("TokenCookie" = [])),
    paths(
        crate::inbound::http::account::register,
        crate::inbound::http::account::login,
        crate::inbound::http::account::logout,
        crate::inbound::http::account::current_user,
        crate::inbound::http::account::update_details,
        crate::inbound::http::account::update_password,
        crate::inbound::http::account::forgot_password,
        crate::inbound::http::account::reset_password,
        crate::inbound::http::bootcamps::list_bootcamps,
        crate::inbound::http::bootcamps::bootcamps_in_radius,
        crate::inbound::http::bootcamps::get_bootcamp,
        crate::inbound::http::bootcamps::create_bootcamp,
        crate::inbound::http::bootcamps::update_bootcamp,
        crate::inbound::http::bootcamps::delete_bootcamp,
        crate::inbound::http::bootcamps::upload_bootcamp_photo,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::courses::list_bootcamp_courses,
        crate::inbound::http::courses::get_course,
        crate::inbound::http::courses::create_course,
        crate::inbound::http::courses::update_course,
        crate::inbound::http::courses::delete_course,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::list_bootcamp_reviews,
        crate::inbound::http::reviews::get_review,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
    ),
    components(schemas(
        ErrorBody,
        LoginRequest,
        UpdatePasswordRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        RegisterUser,
        UpdateUserDetails,
        AdminUpdateUser,
        Role,
        CreateBootcamp,
        UpdateBootcamp,
        BootcampSummary,
        Career,
        CreateCourse,
        UpdateCourse,
        MinimumSkill,
        CreateReview,
        UpdateReview,
    )),
    tags(
        (name = "auth", description = "Registration, login, and credential flows"),
        (name = "bootcamps", description = "Bootcamp directory"),
        (name = "courses", description = "Courses offered by bootcamps"),
        (name = "reviews", description = "Bootcamp reviews"),
        (name = "users", description = "Admin-only user management")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_contributes_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/auth/register"));
        assert!(paths.contains_key("/api/v1/bootcamps"));
        assert!(paths.contains_key("/api/v1/bootcamps/{id}/photo"));
        assert!(paths.contains_key("/api/v1/bootcamps/{bootcampId}/courses"));
        assert!(paths.contains_key("/api/v1/reviews/{id}"));
        assert!(paths.contains_key("/api/v1/users/{id}"));
    }

    #[test]
    fn photo_upload_declares_a_binary_request_body() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serializable document");
        let body = &doc["paths"]["/api/v1/bootcamps/{id}/photo"]["put"]["requestBody"];
        assert!(body.is_object(), "photo upload operation lost its request body");
        assert!(body["content"].get("image/*").is_some());
    }

    #[test]
    fn both_token_schemes_are_registered() {
        let doc = ApiDoc::openapi();
        let schemes = &doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("BearerToken"));
        assert!(schemes.contains_key("TokenCookie"));
    }
}
