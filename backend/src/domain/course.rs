//! Course entity and its validated inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

/// Entry-bar enumeration for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    /// No prior experience expected.
    Beginner,
    /// Some prior experience expected.
    Intermediate,
    /// Substantial prior experience expected.
    Advanced,
}

impl MinimumSkill {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn from_str_opt(raw: &str) -> Option<Self> {
        match raw {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// A course offered by a bootcamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique, trimmed title.
    pub title: String,
    /// Course description.
    pub description: String,
    /// Duration in weeks.
    pub weeks: i32,
    /// Tuition cost.
    pub tuition: f64,
    /// Entry bar.
    pub minimum_skill: MinimumSkill,
    /// Whether a scholarship is available.
    pub scholarship_available: bool,
    /// Owning bootcamp.
    #[serde(rename = "bootcamp")]
    pub bootcamp_id: Uuid,
    /// Authoring user.
    #[serde(rename = "user")]
    pub user_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// `POST /bootcamps/:bootcampId/courses` payload.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    /// Unique title; surrounding whitespace is trimmed.
    pub title: String,
    /// Course description.
    pub description: String,
    /// Duration in weeks.
    pub weeks: i32,
    /// Tuition cost.
    pub tuition: f64,
    /// Entry bar.
    pub minimum_skill: MinimumSkill,
    /// Whether a scholarship is available.
    #[serde(default)]
    pub scholarship_available: bool,
}

impl CreateCourse {
    /// Validate all constraints that do not need the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_request("Please add a course title"));
        }
        if self.description.trim().is_empty() {
            return Err(Error::invalid_request("Please add a course description"));
        }
        if self.weeks < 1 {
            return Err(Error::invalid_request("Duration must be at least one week"));
        }
        if !(self.tuition.is_finite() && self.tuition >= 0.0) {
            return Err(Error::invalid_request("Please add a valid tuition cost"));
        }
        Ok(())
    }

    /// The title with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }
}

/// `PUT /courses/:id` payload; only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement duration.
    #[serde(default)]
    pub weeks: Option<i32>,
    /// Replacement tuition.
    #[serde(default)]
    pub tuition: Option<f64>,
    /// Replacement entry bar.
    #[serde(default)]
    pub minimum_skill: Option<MinimumSkill>,
    /// Replacement scholarship flag.
    #[serde(default)]
    pub scholarship_available: Option<bool>,
}

impl UpdateCourse {
    /// Validate whichever fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::invalid_request("Please add a course title"));
            }
        }
        if let Some(weeks) = self.weeks {
            if weeks < 1 {
                return Err(Error::invalid_request("Duration must be at least one week"));
            }
        }
        if let Some(tuition) = self.tuition {
            if !(tuition.is_finite() && tuition >= 0.0) {
                return Err(Error::invalid_request("Please add a valid tuition cost"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> CreateCourse {
        CreateCourse {
            title: " Front End Web Development ".into(),
            description: "Twelve weeks of HTML, CSS, and JavaScript".into(),
            weeks: 12,
            tuition: 8000.0,
            minimum_skill: MinimumSkill::Beginner,
            scholarship_available: true,
        }
    }

    #[test]
    fn valid_payload_passes_and_title_is_trimmed() {
        let input = create();
        assert!(input.validate().is_ok());
        assert_eq!(input.trimmed_title(), "Front End Web Development");
    }

    #[test]
    fn negative_tuition_is_rejected() {
        let mut input = create();
        input.tuition = -1.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn zero_weeks_is_rejected() {
        let mut input = create();
        input.weeks = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn skill_names_round_trip_through_storage() {
        for skill in [
            MinimumSkill::Beginner,
            MinimumSkill::Intermediate,
            MinimumSkill::Advanced,
        ] {
            assert_eq!(MinimumSkill::from_str_opt(skill.as_str()), Some(skill));
        }
    }
}
