//! Nominatim-compatible geocoding adapter.
//!
//! Speaks the public `/search` API with `format=jsonv2` and takes the first
//! (best-ranked) match. Nominatim's usage policy requires an identifying
//! User-Agent, so the value is part of the adapter's configuration.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::ports::{GeocodeError, GeocodedAddress, Geocoder};

/// HTTP geocoder against a Nominatim-style endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

/// One match as returned by the provider.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(default)]
    address: PlaceAddress,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country_code: Option<String>,
}

impl PlaceAddress {
    fn street(&self) -> Option<String> {
        match (&self.house_number, &self.road) {
            (Some(number), Some(road)) => Some(format!("{number} {road}")),
            (None, Some(road)) => Some(road.clone()),
            _ => None,
        }
    }

    fn city(&self) -> Option<String> {
        self.city
            .clone()
            .or_else(|| self.town.clone())
            .or_else(|| self.village.clone())
    }
}

impl NominatimGeocoder {
    /// Build the adapter.
    ///
    /// # Errors
    ///
    /// [`GeocodeError::Upstream`] when the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| GeocodeError::Upstream {
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
        })
    }

    fn upstream(err: impl std::fmt::Display) -> GeocodeError {
        GeocodeError::Upstream {
            message: err.to_string(),
        }
    }
}

fn parse_coordinate(raw: &str, axis: &str) -> Result<f64, GeocodeError> {
    raw.parse().map_err(|_| GeocodeError::Upstream {
        message: format!("provider returned non-numeric {axis} '{raw}'"),
    })
}

fn into_address(place: Place) -> Result<GeocodedAddress, GeocodeError> {
    let latitude = parse_coordinate(&place.lat, "latitude")?;
    let longitude = parse_coordinate(&place.lon, "longitude")?;
    Ok(GeocodedAddress {
        latitude,
        longitude,
        formatted_address: place.display_name.clone(),
        street: place.address.street(),
        city: place.address.city(),
        state: place.address.state.clone(),
        zipcode: place.address.postcode.clone(),
        country: place.address.country_code.map(|code| code.to_uppercase()),
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        let url = format!("{}/search", self.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", address),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(Self::upstream)?
            .error_for_status()
            .map_err(Self::upstream)?;

        let mut places: Vec<Place> = response.json().await.map_err(Self::upstream)?;
        if places.is_empty() {
            return Err(GeocodeError::NotFound {
                query: address.to_owned(),
            });
        }
        into_address(places.remove(0))
    }
}
