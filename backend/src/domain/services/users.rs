//! Admin user management. Every operation here sits behind the admin role
//! at the transport layer.

use std::sync::Arc;

use chrono::Utc;
use listing::ListQuery;
use uuid::Uuid;

use crate::domain::auth::hash_password;
use crate::domain::ports::UserRepository;
use crate::domain::{AdminUpdateUser, Error, RegisterUser, User};

fn no_user(id: Uuid) -> Error {
    Error::not_found(format!("No user with the id of {id}"))
}

/// Administrative CRUD over accounts.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Wire the service.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// One page of accounts plus the filtered total.
    ///
    /// # Errors
    ///
    /// Store failures map per [`crate::domain::ports::StoreError`].
    pub async fn list(&self, query: &ListQuery) -> Result<(Vec<User>, u64), Error> {
        Ok(self.users.list(query).await?)
    }

    /// A single account by id.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<User, Error> {
        self.users.find_by_id(id).await?.ok_or_else(|| no_user(id))
    }

    /// Create an account with any role, including admin.
    ///
    /// # Errors
    ///
    /// Validation failures and duplicate e-mails surface as
    /// [`Error::invalid_request`].
    pub async fn create(&self, input: RegisterUser) -> Result<User, Error> {
        input.validate_for_admin()?;
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
        Ok(user)
    }

    /// Apply a partial update, including role reassignment.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the id does not exist.
    pub async fn update(&self, id: Uuid, input: AdminUpdateUser) -> Result<User, Error> {
        input.validate()?;
        let mut user = self.get(id).await?;
        if let Some(first_name) = input.first_name {
            user.first_name = first_name.trim().to_owned();
        }
        if let Some(last_name) = input.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(email) = input.email {
            user.email = email.trim().to_lowercase();
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the id does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        if !self.users.delete(id).await? {
            return Err(no_user(id));
        }
        tracing::info!(user_id = %id, "account deleted by admin");
        Ok(())
    }
}
