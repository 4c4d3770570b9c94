//! Review entity and its validated inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

/// Maximum review title length.
pub const TITLE_MAX: usize = 100;
/// Lowest accepted rating.
pub const RATING_MIN: i32 = 1;
/// Highest accepted rating.
pub const RATING_MAX: i32 = 10;

/// A review left on a bootcamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique, bounded title.
    pub title: String,
    /// Free-text body.
    pub text: String,
    /// Rating on a 1-10 scale.
    pub rating: i32,
    /// Reviewed bootcamp.
    #[serde(rename = "bootcamp")]
    pub bootcamp_id: Uuid,
    /// Authoring user.
    #[serde(rename = "user")]
    pub user_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// `POST /bootcamps/:bootcampId/reviews` payload.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    /// Unique title; surrounding whitespace is trimmed.
    pub title: String,
    /// Free-text body.
    pub text: String,
    /// Rating on a 1-10 scale.
    pub rating: i32,
}

fn check_title(title: &str) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(Error::invalid_request("Please add a title for the review"));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(Error::invalid_request(format!(
            "Title cannot be more than {TITLE_MAX} characters"
        )));
    }
    Ok(())
}

fn check_rating(rating: i32) -> Result<(), Error> {
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(Error::invalid_request(format!(
            "Rating must be between {RATING_MIN} and {RATING_MAX}"
        )));
    }
    Ok(())
}

impl CreateReview {
    /// Validate all constraints that do not need the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        check_title(&self.title)?;
        if self.text.trim().is_empty() {
            return Err(Error::invalid_request("Please add some text"));
        }
        check_rating(self.rating)
    }

    /// The title with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }
}

/// `PUT /reviews/:id` payload; only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReview {
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement body.
    #[serde(default)]
    pub text: Option<String>,
    /// Replacement rating.
    #[serde(default)]
    pub rating: Option<i32>,
}

impl UpdateReview {
    /// Validate whichever fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(text) = &self.text {
            if text.trim().is_empty() {
                return Err(Error::invalid_request("Please add some text"));
            }
        }
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        Ok(())
    }
}
