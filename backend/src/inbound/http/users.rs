//! Admin user-management endpoints, all behind the `admin` role.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{AdminUpdateUser, RegisterUser, Role};
use crate::inbound::http::auth::{require_role, AuthenticatedUser};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::respond::{data_response, list_response, parse_list_query};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// List accounts.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "One page of accounts"),
        (status = 403, description = "Caller is not an admin", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Admin])?;
    let query = parse_list_query(req.query_string())?;
    let (items, total) = state.users.list(&query).await?;
    list_response(&items, &query, total, &[])
}

/// A single account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    responses(
        (status = 200, description = "The account"),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Admin])?;
    let found = state.users.get(path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &found))
}

/// Create an account with any role.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "The created account"),
        (status = 400, description = "Validation failure or duplicate email", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<RegisterUser>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Admin])?;
    let created = state.users.create(body.into_inner()).await?;
    Ok(data_response(HttpResponse::Created(), &created))
}

/// Update an account, including its role.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = AdminUpdateUser,
    responses(
        (status = 200, description = "The updated account"),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<AdminUpdateUser>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Admin])?;
    let updated = state
        .users
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(data_response(HttpResponse::Ok(), &updated))
}

/// Delete an account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Unknown id", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_role(&user.0, &[Role::Admin])?;
    state.users.delete(path.into_inner()).await?;
    Ok(data_response(HttpResponse::Ok(), &json!({})))
}
