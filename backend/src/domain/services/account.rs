//! Self-service account flows: registration, login, profile updates, and
//! the password-reset loop.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::{
    hash_password, hash_reset_token, issue_reset_token, verify_password, TokenService,
};
use crate::domain::ports::{Mailer, UserRepository};
use crate::domain::{Error, RegisterUser, UpdateUserDetails, User, PASSWORD_MIN};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration, login, and credential management.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
    public_url: String,
}

impl AccountService {
    /// Wire the service. `public_url` is the externally reachable base used
    /// to compose password-reset links.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: TokenService,
        mailer: Arc<dyn Mailer>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            public_url: public_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Create an account and sign a session token for it.
    ///
    /// # Errors
    ///
    /// Validation failures and duplicate e-mails surface as
    /// [`Error::invalid_request`].
    pub async fn register(&self, input: RegisterUser) -> Result<(User, String), Error> {
        input.validate()?;
        let user = User {
            id: Uuid::new_v4(),
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.clone(),
            email: input.email.trim().to_lowercase(),
            role: input.role_or_default(),
            password_hash: hash_password(&input.password)?,
            reset_password_token_hash: None,
            reset_password_expires_at: None,
            created_at: Utc::now(),
        };
        self.users.insert(&user).await?;
        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "account registered");
        Ok((user, token))
    }

    /// Verify credentials and sign a session token.
    ///
    /// # Errors
    ///
    /// [`Error::unauthorized`] for unknown e-mails and wrong passwords; the
    /// two cases are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::invalid_request(
                "Please provide an email and password",
            ));
        }
        let user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        if !verify_password(password, &user.password_hash) {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let token = self.tokens.issue(user.id)?;
        Ok((user, token))
    }

    /// Resolve a bearer token to its account.
    ///
    /// # Errors
    ///
    /// [`Error::unauthorized`] for expired, invalid, or orphaned tokens.
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let user_id = self
            .tokens
            .verify(token)
            .map_err(|_| Error::unauthorized("Not authorized to access this route"))?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("Not authorized to access this route"))
    }

    /// Update the caller's name and e-mail.
    ///
    /// # Errors
    ///
    /// Validation failures and duplicate e-mails surface as
    /// [`Error::invalid_request`].
    pub async fn update_details(
        &self,
        user: &User,
        input: UpdateUserDetails,
    ) -> Result<User, Error> {
        input.validate()?;
        let mut updated = user.clone();
        if let Some(first_name) = input.first_name {
            updated.first_name = first_name.trim().to_owned();
        }
        if let Some(last_name) = input.last_name {
            updated.last_name = Some(last_name);
        }
        if let Some(email) = input.email {
            updated.email = email.trim().to_lowercase();
        }
        self.users.update(&updated).await?;
        Ok(updated)
    }

    /// Change the caller's password and sign a fresh session token.
    ///
    /// # Errors
    ///
    /// [`Error::unauthorized`] when `current` does not match;
    /// [`Error::invalid_request`] for short passwords or a new password
    /// equal to the current one.
    pub async fn update_password(
        &self,
        user: &User,
        current: &str,
        new: &str,
    ) -> Result<(User, String), Error> {
        if !verify_password(current, &user.password_hash) {
            return Err(Error::unauthorized("Password is incorrect"));
        }
        if new.len() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "Password must be at least {PASSWORD_MIN} characters"
            )));
        }
        if new == current {
            return Err(Error::invalid_request(
                "New password must differ from the current password",
            ));
        }
        let mut updated = user.clone();
        updated.password_hash = hash_password(new)?;
        self.users.update(&updated).await?;
        let token = self.tokens.issue(updated.id)?;
        Ok((updated, token))
    }

    /// Issue a reset token for `email` and deliver it by mail.
    ///
    /// The raw token never touches the store. When delivery fails the
    /// persisted digest and expiry are cleared again so the dead token
    /// cannot linger.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] for unknown e-mails; [`Error::upstream`] when
    /// the mail could not be sent.
    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        let mut user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| Error::not_found("There is no user with that email"))?;

        let reset = issue_reset_token();
        user.reset_password_token_hash = Some(reset.hash.clone());
        user.reset_password_expires_at = Some(reset.expires_at);
        self.users.update(&user).await?;

        let url = format!("{}/api/v1/auth/resetPassword/{}", self.public_url, reset.raw);
        let body = format!(
            "You are receiving this email because you (or someone else) has \
             requested the reset of a password. Please make a PUT request to:\n\n{url}"
        );
        if let Err(err) = self
            .mailer
            .send(&user.email, "Password reset token", &body)
            .await
        {
            tracing::error!(error = %err, user_id = %user.id, "reset mail failed");
            user.reset_password_token_hash = None;
            user.reset_password_expires_at = None;
            self.users.update(&user).await?;
            return Err(Error::upstream("Email could not be sent"));
        }
        Ok(())
    }

    /// Redeem a reset token, set the new password, and sign a session token.
    ///
    /// # Errors
    ///
    /// [`Error::invalid_request`] for unknown or expired tokens and for
    /// short passwords.
    pub async fn reset_password(&self, raw_token: &str, new: &str) -> Result<(User, String), Error> {
        if new.len() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "Password must be at least {PASSWORD_MIN} characters"
            )));
        }
        let hash = hash_reset_token(raw_token);
        let mut user = self
            .users
            .find_by_reset_hash(&hash)
            .await?
            .ok_or_else(|| Error::invalid_request("Invalid token"))?;
        let expires_at = user
            .reset_password_expires_at
            .ok_or_else(|| Error::invalid_request("Invalid token"))?;
        if expires_at <= Utc::now() {
            return Err(Error::invalid_request("Invalid token"));
        }

        user.password_hash = hash_password(new)?;
        user.reset_password_token_hash = None;
        user.reset_password_expires_at = None;
        self.users.update(&user).await?;
        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "password reset completed");
        Ok((user, token))
    }
}
