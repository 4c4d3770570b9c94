//! Bootcamp entity and its validated inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{is_valid_url, require_email};
use super::Error;

/// Maximum bootcamp name length.
pub const NAME_MAX: usize = 50;
/// Maximum description length.
pub const DESCRIPTION_MAX: usize = 500;
/// Maximum phone number length.
pub const PHONE_MAX: usize = 20;
/// Placeholder photo filename assigned at creation.
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// Fixed career list; requests may only choose from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Career {
    /// Web development track.
    #[serde(rename = "Web Development")]
    WebDevelopment,
    /// Mobile development track.
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    /// UI/UX track.
    #[serde(rename = "UI/UX")]
    UiUx,
    /// Data science track.
    #[serde(rename = "Data Science")]
    DataScience,
    /// Business track.
    #[serde(rename = "Business")]
    Business,
    /// Anything else.
    #[serde(rename = "Other")]
    Other,
}

impl Career {
    /// Stable storage representation (matches the serialized name).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebDevelopment => "Web Development",
            Self::MobileDevelopment => "Mobile Development",
            Self::UiUx => "UI/UX",
            Self::DataScience => "Data Science",
            Self::Business => "Business",
            Self::Other => "Other",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn from_str_opt(raw: &str) -> Option<Self> {
        match raw {
            "Web Development" => Some(Self::WebDevelopment),
            "Mobile Development" => Some(Self::MobileDevelopment),
            "UI/UX" => Some(Self::UiUx),
            "Data Science" => Some(Self::DataScience),
            "Business" => Some(Self::Business),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Geocoded point plus structured address parts.
///
/// The client-supplied address is consumed by the geocoder and never
/// stored; this derived location is what persists and serializes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// GeoJSON-style type tag; always `"Point"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
    /// Full formatted address from the geocoder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    /// Street line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State or region code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    /// Country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Location {
    /// Longitude of the geocoded point.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    /// Latitude of the geocoded point.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// A published bootcamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// URL-friendly form of the name.
    pub slug: String,
    /// Description shown in listings.
    pub description: String,
    /// Optional website URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Optional contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Optional contact e-mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Geocoded location derived from the submitted address.
    pub location: Location,
    /// Careers taught, drawn from the fixed list.
    pub careers: Vec<Career>,
    /// Derived mean review rating; never client-settable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Derived mean tuition, rounded up to the next multiple of ten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<f64>,
    /// Photo filename under the upload directory.
    pub photo: String,
    /// Housing provided.
    pub housing: bool,
    /// Job assistance provided.
    pub job_assistance: bool,
    /// Job guarantee offered.
    pub job_guarantee: bool,
    /// GI Bill accepted.
    pub accept_gi: bool,
    /// Owning user.
    #[serde(rename = "user")]
    pub user_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Name-and-description projection joined into course and review listings.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootcampSummary {
    /// Bootcamp identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Listing description.
    pub description: String,
}

/// `POST /bootcamps` payload.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBootcamp {
    /// Unique display name.
    pub name: String,
    /// Description shown in listings.
    pub description: String,
    /// Optional website URL.
    #[serde(default)]
    pub website: Option<String>,
    /// Optional contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Address handed to the geocoder, then discarded.
    pub address: String,
    /// Careers taught.
    pub careers: Vec<Career>,
    /// Housing provided.
    #[serde(default)]
    pub housing: bool,
    /// Job assistance provided.
    #[serde(default)]
    pub job_assistance: bool,
    /// Job guarantee offered.
    #[serde(default)]
    pub job_guarantee: bool,
    /// GI Bill accepted.
    #[serde(default)]
    pub accept_gi: bool,
}

fn check_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::invalid_request("Please add a name"));
    }
    if name.chars().count() > NAME_MAX {
        return Err(Error::invalid_request(format!(
            "Name cannot be more than {NAME_MAX} characters"
        )));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), Error> {
    if description.trim().is_empty() {
        return Err(Error::invalid_request("Please add a description"));
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(Error::invalid_request(format!(
            "Description cannot be more than {DESCRIPTION_MAX} characters"
        )));
    }
    Ok(())
}

fn check_optional_contact(
    website: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<(), Error> {
    if let Some(website) = website {
        if !is_valid_url(website) {
            return Err(Error::invalid_request(
                "Please use a valid URL with HTTP or HTTPS",
            ));
        }
    }
    if let Some(phone) = phone {
        if phone.chars().count() > PHONE_MAX {
            return Err(Error::invalid_request(format!(
                "Phone number cannot be longer than {PHONE_MAX} characters"
            )));
        }
    }
    if let Some(email) = email {
        require_email(email)?;
    }
    Ok(())
}

impl CreateBootcamp {
    /// Validate all constraints that do not need the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        check_name(&self.name)?;
        check_description(&self.description)?;
        check_optional_contact(
            self.website.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
        )?;
        if self.address.trim().is_empty() {
            return Err(Error::invalid_request("Please add an address"));
        }
        if self.careers.is_empty() {
            return Err(Error::invalid_request("Please add at least one career"));
        }
        Ok(())
    }
}

/// `PUT /bootcamps/:id` payload; only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBootcamp {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement website.
    #[serde(default)]
    pub website: Option<String>,
    /// Replacement phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Replacement contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// New address; triggers re-geocoding when present.
    #[serde(default)]
    pub address: Option<String>,
    /// Replacement career list.
    #[serde(default)]
    pub careers: Option<Vec<Career>>,
    /// Replacement housing flag.
    #[serde(default)]
    pub housing: Option<bool>,
    /// Replacement job-assistance flag.
    #[serde(default)]
    pub job_assistance: Option<bool>,
    /// Replacement job-guarantee flag.
    #[serde(default)]
    pub job_guarantee: Option<bool>,
    /// Replacement GI flag.
    #[serde(default)]
    pub accept_gi: Option<bool>,
}

impl UpdateBootcamp {
    /// Validate whichever fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        check_optional_contact(
            self.website.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
        )?;
        if let Some(address) = &self.address {
            if address.trim().is_empty() {
                return Err(Error::invalid_request("Please add an address"));
            }
        }
        if let Some(careers) = &self.careers {
            if careers.is_empty() {
                return Err(Error::invalid_request("Please add at least one career"));
            }
        }
        Ok(())
    }
}
