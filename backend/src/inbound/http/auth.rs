//! Request authentication and role checks.
//!
//! Identity arrives either as `Authorization: Bearer <jwt>` or in the
//! `token` cookie set at login; the header wins when both are present.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Role, User};
use crate::inbound::http::state::HttpState;

/// Cookie holding the session token.
pub const TOKEN_COOKIE: &str = "token";

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

/// The authenticated caller, resolved from the request's token.
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .ok_or_else(|| Error::internal("HTTP state not configured"))?;
            let token = bearer_token(&req)
                .or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_owned()))
                .ok_or_else(|| Error::unauthorized(NOT_AUTHORIZED))?;
            let user = state.account.authenticate(&token).await?;
            Ok(Self(user))
        })
    }
}

/// Reject callers whose role is not in `allowed`.
///
/// # Errors
///
/// Returns [`Error::forbidden`] naming the caller's role.
pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), Error> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role.as_str()
        )))
    }
}

/// Session cookie carrying a freshly issued token.
#[must_use]
pub fn token_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(1))
        .finish()
}

/// Expired cookie used by logout.
#[must_use]
pub fn clear_token_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, "none")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(10))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_outside_the_allow_list_are_forbidden() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: None,
            email: "ada@example.com".into(),
            role: Role::Publisher,
            password_hash: "digest".into(),
            reset_password_token_hash: None,
            reset_password_expires_at: None,
            created_at: chrono::Utc::now(),
        };
        assert!(require_role(&user, &[Role::Publisher, Role::Admin]).is_ok());
        let err = require_role(&user, &[Role::User, Role::Admin]).unwrap_err();
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
        assert!(err.message().contains("publisher"));
    }

    #[test]
    fn token_cookie_is_http_only_and_scoped_to_root() {
        let cookie = token_cookie("jwt-value".into(), true);
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::days(1)));
    }

    #[test]
    fn logout_cookie_expires_quickly() {
        let cookie = clear_token_cookie(false);
        assert_eq!(cookie.value(), "none");
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(10)));
    }
}
