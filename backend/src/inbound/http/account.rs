//! Authentication endpoints.
//!
//! ```text
//! POST /api/v1/auth/register
//! POST /api/v1/auth/login
//! GET  /api/v1/auth/logout
//! GET  /api/v1/auth/getUser
//! PUT  /api/v1/auth/updateUser
//! POST /api/v1/auth/updatePassword
//! POST /api/v1/auth/forgotPassword
//! PUT  /api/v1/auth/resetPassword/{resettoken}
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{RegisterUser, UpdateUserDetails};
use crate::inbound::http::auth::{clear_token_cookie, token_cookie, AuthenticatedUser};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::respond::data_response;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Login payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Account e-mail.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Password-change payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    /// The password in use now.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// Reset-request payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ForgotPasswordRequest {
    /// Account e-mail to send the reset token to.
    pub email: String,
}

/// Reset-completion payload.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ResetPasswordRequest {
    /// The replacement password.
    pub password: String,
}

/// `{success, token}` plus the `token` cookie.
fn token_response(state: &HttpState, token: String) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(token_cookie(token.clone(), state.cookie_secure))
        .json(json!({"success": true, "token": token}))
}

/// Register an account and sign in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterUser,
    responses(
        (status = 200, description = "Account created; session token issued"),
        (status = 400, description = "Validation failure or duplicate email", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    body: web::Json<RegisterUser>,
) -> ApiResult<HttpResponse> {
    let (_, token) = state.account.register(body.into_inner()).await?;
    Ok(token_response(&state, token))
}

/// Sign in with e-mail and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued"),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let (_, token) = state.account.login(&body.email, &body.password).await?;
    Ok(token_response(&state, token))
}

/// Clear the session cookie.
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Cookie cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[get("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(clear_token_cookie(state.cookie_secure))
        .json(json!({"success": true, "data": {}}))
}

/// The calling account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/getUser",
    responses(
        (status = 200, description = "The authenticated account"),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "getUser"
)]
#[get("/auth/getUser")]
pub async fn current_user(user: AuthenticatedUser) -> HttpResponse {
    data_response(HttpResponse::Ok(), &user.0)
}

/// Update the caller's name and e-mail.
#[utoipa::path(
    put,
    path = "/api/v1/auth/updateUser",
    request_body = UpdateUserDetails,
    responses(
        (status = 200, description = "Updated account"),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "updateUser"
)]
#[put("/auth/updateUser")]
pub async fn update_details(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<UpdateUserDetails>,
) -> ApiResult<HttpResponse> {
    let updated = state
        .account
        .update_details(&user.0, body.into_inner())
        .await?;
    Ok(data_response(HttpResponse::Ok(), &updated))
}

/// Change the caller's password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/updatePassword",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed; fresh token issued"),
        (status = 401, description = "Current password incorrect", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "updatePassword"
)]
#[post("/auth/updatePassword")]
pub async fn update_password(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<UpdatePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let (_, token) = state
        .account
        .update_password(&user.0, &body.current_password, &body.new_password)
        .await?;
    Ok(token_response(&state, token))
}

/// Send a password-reset token by mail.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgotPassword",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset mail sent"),
        (status = 404, description = "Unknown email", body = ErrorBody),
        (status = 500, description = "Mail delivery failed", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword"
)]
#[post("/auth/forgotPassword")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    body: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    state.account.forgot_password(&body.email).await?;
    Ok(data_response(HttpResponse::Ok(), &"Email sent"))
}

/// Redeem a reset token.
#[utoipa::path(
    put,
    path = "/api/v1/auth/resetPassword/{resettoken}",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset; session token issued"),
        (status = 400, description = "Invalid or expired token", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "resetPassword"
)]
#[put("/auth/resetPassword/{resettoken}")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let (_, token) = state
        .account
        .reset_password(&path.into_inner(), &body.password)
        .await?;
    Ok(token_response(&state, token))
}
