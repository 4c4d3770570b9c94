//! Review endpoints.
//!
//! ```text
//! GET    /api/v1/reviews
//! GET    /api/v1/reviews/{id}
//! PUT    /api/v1/reviews/{id}
//! DELETE /api/v1/reviews/{id}
//! GET    /api/v1/bootcamps/{bootcampId}/reviews
//! POST   /api/v1/bootcamps/{bootcampId}/reviews
//! ```
//!
//! Publisher accounts cannot author reviews; only `user` and `admin` roles
//! may write here.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::ReviewListItem;
use crate::domain::{CreateReview, Error, Role, UpdateReview};
use crate::inbound::http::auth::{require_role, AuthenticatedUser};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::respond::{data_response, list_response, parse_list_query, to_value};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Serialize a review with its bootcamp summary in place of the bare id.
fn item_value(item: &ReviewListItem) -> Result<serde_json::Value, Error> {
    let mut value = to_value(&item.review)?;
    value["bootcamp"] = to_value(&item.bootcamp)?;
    Ok(value)
}

/// List every review.
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses(
        (status = 200, description = "One page of reviews"),
        (status = 400, description = "Malformed query parameter", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "listReviews"
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = parse_list_query(req.query_string())?;
    let (items, total) = state.reviews.list(&query, None).await?;
    let values = items.iter().map(item_value).collect::<Result<Vec<_>, _>>()?;
    list_response(&values, &query, total, &["bootcamp"])
}

/// List the reviews of one bootcamp.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{bootcampId}/reviews",
    responses(
        (status = 200, description = "One page of the bootcamp's reviews"),
        (status = 404, description = "Unknown bootcamp", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "listBootcampReviews"
)]
#[get("/bootcamps/{bootcamp_id}/reviews")]
pub async fn list_bootcamp_reviews(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = parse_list_query(req.query_string())?;
    let (items, total) = state
        .reviews
        .list(&query, Some(path.into_inner()))
        .await?;
    let values = items.iter().map(item_value).collect::<Result<Vec<_>, _>>()?;
    list_response(&values, &query, total, &["bootcamp"])
}

/// A single review.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    responses(
        (status = 200, description = "The review"),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "getReview"
)]
#[get("/reviews/{id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let item = state.reviews.get(path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &item_value(&item)?))
}

/// Leave a review on a bootcamp.
#[utoipa::path(
    post,
    path = "/api/v1/bootcamps/{bootcampId}/reviews",
    request_body = CreateReview,
    responses(
        (status = 201, description = "The created review"),
        (status = 400, description = "Validation failure or duplicate review", body = ErrorBody),
        (status = 404, description = "Unknown bootcamp", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/bootcamps/{bootcamp_id}/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateReview>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::User, Role::Admin])?;
    let review = state
        .reviews
        .create(&user.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(data_response(HttpResponse::Created(), &review))
}

/// Update a review.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    request_body = UpdateReview,
    responses(
        (status = 200, description = "The updated review"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[put("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReview>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::User, Role::Admin])?;
    let review = state
        .reviews
        .update(&user.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(data_response(HttpResponse::Ok(), &review))
}

/// Delete a review.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::User, Role::Admin])?;
    state.reviews.delete(&user.0, path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &json!({})))
}
