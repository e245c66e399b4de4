//! Reverse geocoding against the OpenStreetMap Nominatim API. Used to turn a
//! picked latitude/longitude into a place name during registration and post
//! authoring.

use crate::api::{ApiClient, ApiError};
use serde::Deserialize;

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

#[derive(Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Deserialize, Default)]
struct Address {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    county: Option<String>,
}

/// Nominatim wrapper around the shared [`ApiClient`], so reverse lookups get
/// the same timeout, retry, and user-agent handling as backend calls.
pub struct Geocoder {
    api: ApiClient,
}

impl Geocoder {
    /// # Errors
    /// Returns `ApiError::Config` when the well-known base URL fails to
    /// parse, which would be a build defect.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base(NOMINATIM_BASE)
    }

    /// # Errors
    /// Returns `ApiError::Config` on an invalid base URL.
    pub fn with_base(base: &str) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(base)?,
        })
    }

    /// Resolve coordinates to a locality name, preferring city, then town,
    /// then county. `None` means the lookup succeeded but named no locality.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, ApiError> {
        let response: ReverseResponse = self
            .api
            .get_json(
                &format!("/reverse?lat={latitude}&lon={longitude}&format=json"),
                None,
            )
            .await?;

        Ok(response.address.and_then(|a| {
            a.city.or(a.town).or(a.county)
        }))
    }
}

/// One-shot reverse lookup against the public Nominatim instance.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn reverse_geocode(latitude: f64, longitude: f64) -> Result<Option<String>, ApiError> {
    Geocoder::new()?.reverse(latitude, longitude).await
}
