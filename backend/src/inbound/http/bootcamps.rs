//! Bootcamp endpoints.
//!
//! ```text
//! GET    /api/v1/bootcamps
//! GET    /api/v1/bootcamps/radius/{zipcode}/{distance}
//! GET    /api/v1/bootcamps/{id}
//! POST   /api/v1/bootcamps
//! PUT    /api/v1/bootcamps/{id}
//! DELETE /api/v1/bootcamps/{id}
//! PUT    /api/v1/bootcamps/{id}/photo
//! ```

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::services::PhotoUpload;
use crate::domain::{CreateBootcamp, Error, Role, UpdateBootcamp};
use crate::inbound::http::auth::{require_role, AuthenticatedUser};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::respond::{data_response, list_response, parse_list_query};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// List bootcamps with filtering, selection, sorting, and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps",
    responses(
        (status = 200, description = "One page of bootcamps"),
        (status = 400, description = "Malformed query parameter", body = ErrorBody)
    ),
    tags = ["bootcamps"],
    operation_id = "listBootcamps"
)]
#[get("/bootcamps")]
pub async fn list_bootcamps(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = parse_list_query(req.query_string())?;
    let (items, total) = state.bootcamps.list(&query).await?;
    list_response(&items, &query, total, &[])
}

/// Bootcamps within a distance (miles) of a zipcode.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/radius/{zipcode}/{distance}",
    responses(
        (status = 200, description = "Bootcamps inside the circle"),
        (status = 400, description = "Bad distance or un-geocodable zipcode", body = ErrorBody)
    ),
    tags = ["bootcamps"],
    operation_id = "getBootcampsInRadius"
)]
#[get("/bootcamps/radius/{zipcode}/{distance}")]
pub async fn bootcamps_in_radius(
    state: web::Data<HttpState>,
    path: web::Path<(String, f64)>,
) -> ApiResult<HttpResponse> {
    let (zipcode, distance) = path.into_inner();
    let items = state.bootcamps.within_radius(&zipcode, distance).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": items.len(),
        "data": items,
    })))
}

/// A single bootcamp.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{id}",
    responses(
        (status = 200, description = "The bootcamp"),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["bootcamps"],
    operation_id = "getBootcamp"
)]
#[get("/bootcamps/{id}")]
pub async fn get_bootcamp(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let bootcamp = state.bootcamps.get(path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &bootcamp))
}

/// Publish a bootcamp.
#[utoipa::path(
    post,
    path = "/api/v1/bootcamps",
    request_body = CreateBootcamp,
    responses(
        (status = 201, description = "The published bootcamp"),
        (status = 400, description = "Validation failure or publish limit", body = ErrorBody),
        (status = 403, description = "Role not allowed", body = ErrorBody)
    ),
    tags = ["bootcamps"],
    operation_id = "createBootcamp"
)]
#[post("/bootcamps")]
pub async fn create_bootcamp(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<CreateBootcamp>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Publisher, Role::Admin])?;
    let bootcamp = state.bootcamps.create(&user.0, body.into_inner()).await?;
    Ok(data_response(HttpResponse::Created(), &bootcamp))
}

/// Update a bootcamp.
#[utoipa::path(
    put,
    path = "/api/v1/bootcamps/{id}",
    request_body = UpdateBootcamp,
    responses(
        (status = 200, description = "The updated bootcamp"),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["bootcamps"],
    operation_id = "updateBootcamp"
)]
#[put("/bootcamps/{id}")]
pub async fn update_bootcamp(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBootcamp>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Publisher, Role::Admin])?;
    let bootcamp = state
        .bootcamps
        .update(&user.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(data_response(HttpResponse::Ok(), &bootcamp))
}

/// Delete a bootcamp and its courses and reviews.
#[utoipa::path(
    delete,
    path = "/api/v1/bootcamps/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["bootcamps"],
    operation_id = "deleteBootcamp"
)]
#[delete("/bootcamps/{id}")]
pub async fn delete_bootcamp(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Publisher, Role::Admin])?;
    state.bootcamps.delete(&user.0, path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &json!({})))
}

/// Upload a bootcamp photo as the raw request body.
#[utoipa::path(
    put,
    path = "/api/v1/bootcamps/{id}/photo",
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = 200, description = "Stored filename"),
        (status = 400, description = "Not an image or too large", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody)
    ),
    tags = ["bootcamps"],
    operation_id = "uploadBootcampPhoto"
)]
#[put("/bootcamps/{id}/photo")]
pub async fn upload_bootcamp_photo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: HttpRequest,
    bytes: web::Bytes,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Publisher, Role::Admin])?;
    let content_type = req
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_owned())
        .ok_or_else(|| Error::invalid_request("Please upload an image file"))?;

    let filename = state
        .bootcamps
        .upload_photo(
            &user.0,
            path.into_inner(),
            PhotoUpload {
                content_type,
                bytes: bytes.to_vec(),
            },
        )
        .await?;
    Ok(data_response(HttpResponse::Ok(), &filename))
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{
        register_admin, register_publisher, register_user, spawn_app, TestContext,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn create_payload(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "description": "Full stack development",
            "address": "233 Bay State Rd Boston MA 02215",
            "careers": ["Web Development"],
        })
    }

    async fn create_bootcamp(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        token: &str,
        name: &str,
    ) -> serde_json::Value {
        let response = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/bootcamps")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(create_payload(name))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        test::read_body_json(response).await
    }

    #[actix_rt::test]
    async fn listing_wraps_results_in_the_envelope() {
        let ctx = TestContext::new();
        let (_, token) = register_admin(&ctx, "admin@example.com").await;
        let app = spawn_app(&ctx).await;
        create_bootcamp(&app, &token, "Devworks").await;
        create_bootcamp(&app, &token, "ModernTech").await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bootcamps?limit=1&page=1")
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["pagination"]["next"]["page"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn select_projects_fields_but_keeps_id() {
        let ctx = TestContext::new();
        let (_, token) = register_admin(&ctx, "admin@example.com").await;
        let app = spawn_app(&ctx).await;
        create_bootcamp(&app, &token, "Devworks").await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bootcamps?select=name")
                .to_request(),
        )
        .await;
        let record = &body["data"][0];
        assert_eq!(record["name"], "Devworks");
        assert!(record.get("description").is_none());
        assert!(record.get("id").is_some());
    }

    #[actix_rt::test]
    async fn unknown_filter_operator_is_a_bad_request() {
        let ctx = TestContext::new();
        let app = spawn_app(&ctx).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bootcamps?careers[regex]=x")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn plain_users_cannot_publish() {
        let ctx = TestContext::new();
        let (_, token) = register_user(&ctx, "user@example.com").await;
        let app = spawn_app(&ctx).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bootcamps")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(create_payload("Devworks"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn second_publish_is_a_bad_request() {
        let ctx = TestContext::new();
        let (_, token) = register_publisher(&ctx, "pub@example.com").await;
        let app = spawn_app(&ctx).await;
        create_bootcamp(&app, &token, "First").await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/bootcamps")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(create_payload("Second"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn get_with_unknown_id_is_not_found() {
        let ctx = TestContext::new();
        let app = spawn_app(&ctx).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/bootcamps/{}", uuid::Uuid::new_v4()))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[actix_rt::test]
    async fn non_owner_update_is_forbidden() {
        let ctx = TestContext::new();
        let (_, owner_token) = register_publisher(&ctx, "owner@example.com").await;
        let (_, other_token) = register_publisher(&ctx, "other@example.com").await;
        let app = spawn_app(&ctx).await;
        let created = create_bootcamp(&app, &owner_token, "Devworks").await;
        let id = created["data"]["id"].as_str().unwrap().to_owned();

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/bootcamps/{id}"))
                .insert_header(("Authorization", format!("Bearer {other_token}")))
                .set_json(serde_json::json!({"housing": true}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn photo_upload_rejects_non_images() {
        let ctx = TestContext::new();
        let (_, token) = register_publisher(&ctx, "owner@example.com").await;
        let app = spawn_app(&ctx).await;
        let created = create_bootcamp(&app, &token, "Devworks").await;
        let id = created["data"]["id"].as_str().unwrap().to_owned();

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/bootcamps/{id}/photo"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .insert_header(("Content-Type", "application/pdf"))
                .set_payload(vec![1_u8, 2, 3])
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn photo_upload_stores_and_records_the_filename() {
        let ctx = TestContext::new();
        let (_, token) = register_publisher(&ctx, "owner@example.com").await;
        let app = spawn_app(&ctx).await;
        let created = create_bootcamp(&app, &token, "Devworks").await;
        let id = created["data"]["id"].as_str().unwrap().to_owned();

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/bootcamps/{id}/photo"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .insert_header(("Content-Type", "image/png"))
                .set_payload(vec![0_u8; 64])
                .to_request(),
        )
        .await;
        assert_eq!(body["data"], format!("photo_{id}.png"));
        assert!(ctx.photos.last().is_some());
    }

    #[actix_rt::test]
    async fn radius_search_returns_count_and_data() {
        let ctx = TestContext::new();
        let (_, token) = register_publisher(&ctx, "owner@example.com").await;
        let app = spawn_app(&ctx).await;
        create_bootcamp(&app, &token, "Devworks").await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/bootcamps/radius/02215/50")
                .to_request(),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
    }
}
