use async_trait::async_trait;

use crate::domain::Error;

/// Structured result of geocoding a free-form address.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeocodedAddress {
    /// Latitude of the best match.
    pub latitude: f64,
    /// Longitude of the best match.
    pub longitude: f64,
    /// Full formatted address.
    pub formatted_address: Option<String>,
    /// Street line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or region code.
    pub state: Option<String>,
    /// Postal code.
    pub zipcode: Option<String>,
    /// Country code.
    pub country: Option<String>,
}

/// Geocoding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// The provider returned no match for the query.
    #[error("no location found for '{query}'")]
    NotFound {
        /// The address that failed to resolve.
        query: String,
    },
    /// The provider was unreachable or answered malformed data.
    #[error("geocoding provider failed: {message}")]
    Upstream {
        /// Adapter-level detail.
        message: String,
    },
}

impl From<GeocodeError> for Error {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound { query } => {
                Self::invalid_request(format!("Could not geocode address '{query}'"))
            }
            GeocodeError::Upstream { message } => {
                tracing::error!(error = %message, "geocoder failure");
                Self::upstream("Geocoding service unavailable")
            }
        }
    }
}

/// Resolves free-form addresses to coordinates and address parts.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode a single address, returning the best match.
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError>;
}
