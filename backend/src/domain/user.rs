//! User accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::require_email;
use super::Error;

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;

/// Closed role enumeration; `admin` accounts are provisioned, never
/// self-registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standard account; may author reviews.
    User,
    /// May publish one bootcamp and its courses.
    Publisher,
    /// Full access to every resource.
    Admin,
}

impl Role {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Publisher => "publisher",
            Self::Admin => "admin",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn from_str_opt(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "publisher" => Some(Self::Publisher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// A registered account.
///
/// The password hash and reset-token fields never serialize; every response
/// path goes through this struct's `Serialize` impl.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Optional family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Unique e-mail address, stored lowercased.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// bcrypt digest; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// SHA-256 digest of the outstanding reset token; never serialized.
    #[serde(skip_serializing)]
    pub reset_password_token_hash: Option<String>,
    /// Expiry of the outstanding reset token; never serialized.
    #[serde(skip_serializing)]
    pub reset_password_expires_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this account holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin rule shared by every mutating resource handler.
    #[must_use]
    pub fn may_modify(&self, owner: Uuid) -> bool {
        self.id == owner || self.is_admin()
    }
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    /// Given name.
    pub first_name: String,
    /// Optional family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// E-mail address; must be unique.
    pub email: String,
    /// Plaintext password, hashed before persistence.
    pub password: String,
    /// Requested role; defaults to `user`, `admin` is rejected.
    #[serde(default)]
    pub role: Option<Role>,
}

impl RegisterUser {
    /// Validate lengths, e-mail shape, and the requested role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.first_name.trim().is_empty() {
            return Err(Error::invalid_request("Please add a name"));
        }
        require_email(&self.email)?;
        if self.password.len() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "Password must be at least {PASSWORD_MIN} characters"
            )));
        }
        if self.role == Some(Role::Admin) {
            return Err(Error::invalid_request("Cannot register an admin account"));
        }
        Ok(())
    }

    /// The effective role after defaulting.
    #[must_use]
    pub fn role_or_default(&self) -> Role {
        self.role.unwrap_or(Role::User)
    }

    /// Validation for the admin user-management surface, where any role may
    /// be assigned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate_for_admin(&self) -> Result<(), Error> {
        if self.first_name.trim().is_empty() {
            return Err(Error::invalid_request("Please add a name"));
        }
        require_email(&self.email)?;
        if self.password.len() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "Password must be at least {PASSWORD_MIN} characters"
            )));
        }
        Ok(())
    }
}

/// `PUT /auth/updateUser` payload: name and e-mail only.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDetails {
    /// Replacement given name, when present.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Replacement family name, when present.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Replacement e-mail, when present.
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateUserDetails {
    /// Validate whichever fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(first_name) = &self.first_name {
            if first_name.trim().is_empty() {
                return Err(Error::invalid_request("Please add a name"));
            }
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        Ok(())
    }
}

/// Admin `PUT /users/:id` payload; may also reassign the role.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUser {
    /// Replacement given name, when present.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Replacement family name, when present.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Replacement e-mail, when present.
    #[serde(default)]
    pub email: Option<String>,
    /// Replacement role, when present.
    #[serde(default)]
    pub role: Option<Role>,
}

impl AdminUpdateUser {
    /// Validate whichever fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(first_name) = &self.first_name {
            if first_name.trim().is_empty() {
                return Err(Error::invalid_request("Please add a name"));
            }
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        Ok(())
    }
}
