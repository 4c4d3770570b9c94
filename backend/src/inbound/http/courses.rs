//! Course endpoints.
//!
//! ```text
//! GET    /api/v1/courses
//! GET    /api/v1/courses/{id}
//! PUT    /api/v1/courses/{id}
//! DELETE /api/v1/courses/{id}
//! GET    /api/v1/bootcamps/{bootcampId}/courses
//! POST   /api/v1/bootcamps/{bootcampId}/courses
//! ```

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::CourseListItem;
use crate::domain::{CreateCourse, Error, Role, UpdateCourse};
use crate::inbound::http::auth::{require_role, AuthenticatedUser};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::respond::{data_response, list_response, parse_list_query, to_value};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Serialize a course with its bootcamp summary in place of the bare id.
fn item_value(item: &CourseListItem) -> Result<serde_json::Value, Error> {
    let mut value = to_value(&item.course)?;
    value["bootcamp"] = to_value(&item.bootcamp)?;
    Ok(value)
}

/// List every course.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "One page of courses"),
        (status = 400, description = "Malformed query parameter", body = ErrorBody)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = parse_list_query(req.query_string())?;
    let (items, total) = state.courses.list(&query, None).await?;
    let values = items.iter().map(item_value).collect::<Result<Vec<_>, _>>()?;
    list_response(&values, &query, total, &["bootcamp"])
}

/// List the courses of one bootcamp.
#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{bootcampId}/courses",
    responses(
        (status = 200, description = "One page of the bootcamp's courses"),
        (status = 404, description = "Unknown bootcamp", body = ErrorBody)
    ),
    tags = ["courses"],
    operation_id = "listBootcampCourses"
)]
#[get("/bootcamps/{bootcamp_id}/courses")]
pub async fn list_bootcamp_courses(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = parse_list_query(req.query_string())?;
    let (items, total) = state
        .courses
        .list(&query, Some(path.into_inner()))
        .await?;
    let values = items.iter().map(item_value).collect::<Result<Vec<_>, _>>()?;
    list_response(&values, &query, total, &["bootcamp"])
}

/// A single course.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    responses(
        (status = 200, description = "The course"),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["courses"],
    operation_id = "getCourse"
)]
#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let item = state.courses.get(path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &item_value(&item)?))
}

/// Add a course to a bootcamp.
#[utoipa::path(
    post,
    path = "/api/v1/bootcamps/{bootcampId}/courses",
    request_body = CreateCourse,
    responses(
        (status = 200, description = "The created course"),
        (status = 403, description = "Not the bootcamp owner", body = ErrorBody),
        (status = 404, description = "Unknown bootcamp", body = ErrorBody)
    ),
    tags = ["courses"],
    operation_id = "createCourse"
)]
#[post("/bootcamps/{bootcamp_id}/courses")]
pub async fn create_course(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateCourse>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Publisher, Role::Admin])?;
    let course = state
        .courses
        .create(&user.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(data_response(HttpResponse::Ok(), &course))
}

/// Update a course.
#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    request_body = UpdateCourse,
    responses(
        (status = 200, description = "The updated course"),
        (status = 403, description = "Not the course owner", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["courses"],
    operation_id = "updateCourse"
)]
#[put("/courses/{id}")]
pub async fn update_course(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCourse>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Publisher, Role::Admin])?;
    let course = state
        .courses
        .update(&user.0, path.into_inner(), body.into_inner())
        .await?;
    Ok(data_response(HttpResponse::Ok(), &course))
}

/// Delete a course.
#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the course owner", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["courses"],
    operation_id = "deleteCourse"
)]
#[delete("/courses/{id}")]
pub async fn delete_course(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Publisher, Role::Admin])?;
    state.courses.delete(&user.0, path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &json!({})))
}
