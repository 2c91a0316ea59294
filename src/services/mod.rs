use std::{str::FromStr, time::Duration};

use derive_more::Display;
use serde::Serialize;
use thiserror::Error;

pub mod geocoding;
pub mod google;
pub mod places;
pub mod travel_time;

pub use self::geocoding::GeocodingService;
pub use self::google::GoogleMapsService;
pub use self::places::PlacesService;
pub use self::travel_time::TravelTimeService;

/// Everything the meeting pipeline needs from a mapping backend.
pub trait MappingProvider: GeocodingService + TravelTimeService + PlacesService {}

impl<T> MappingProvider for T where T: GeocodingService + TravelTimeService + PlacesService {}

/// A WGS84 position in degrees. Never range-checked.
///
/// Displays as `lat,lng`, which is the form the routing endpoints expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Display)]
#[display(fmt = "{},{}", latitude, longitude)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Coordinate::new(self.latitude + d_lat, self.longitude + d_lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[display(fmt = "driving")]
    Driving,
    #[display(fmt = "walking")]
    Walking,
    #[display(fmt = "bicycling")]
    Bicycling,
    #[display(fmt = "transit")]
    Transit,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown transport mode `{0}`. Use driving, walking, bicycling or transit.")]
pub struct UnknownTransportMode(pub String);

impl FromStr for TransportMode {
    type Err = UnknownTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(TransportMode::Driving),
            "walking" | "walk" => Ok(TransportMode::Walking),
            "bicycling" | "bike" | "cycling" => Ok(TransportMode::Bicycling),
            "transit" => Ok(TransportMode::Transit),
            _ => Err(UnknownTransportMode(s.to_string())),
        }
    }
}

/// Duration of a trip, or the fact that no route could be obtained.
///
/// Serializes as a number of seconds, or `null` when unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TravelTime {
    Seconds(f64),
    Unreachable,
}

impl TravelTime {
    pub fn seconds(self) -> Option<f64> {
        match self {
            TravelTime::Seconds(secs) => Some(secs),
            TravelTime::Unreachable => None,
        }
    }

    /// Mean over the reachable entries only.
    pub fn mean(times: &[TravelTime]) -> TravelTime {
        let reachable: Vec<f64> = times.iter().filter_map(|t| t.seconds()).collect();
        if reachable.is_empty() {
            return TravelTime::Unreachable;
        }
        TravelTime::Seconds(reachable.iter().sum::<f64>() / reachable.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub place_id: Option<String>,
}

impl Venue {
    pub const PLACEHOLDER_NAME: &'static str = "Meeting Point";
    pub const PLACEHOLDER_ADDRESS: &'static str = "No venue found";

    /// Stand-in used when the provider has nothing near `coordinate`.
    pub fn placeholder(coordinate: Coordinate) -> Self {
        Venue {
            name: Self::PLACEHOLDER_NAME.to_string(),
            address: Self::PLACEHOLDER_ADDRESS.to_string(),
            coordinate,
            place_id: None,
        }
    }
}

/// Connection settings for the mapping backend.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub timeout: Duration,
    pub base_url: String,
}

impl ProviderConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://maps.googleapis.com/maps/api";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(api_key: impl Into<String>) -> Self {
        ProviderConfig {
            api_key: api_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Failures inside the adapter. Never leaves the `services` module.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Geocoding request failed: {0}")]
    Geocoding(String),
    #[error("Request timed out after {0:?}.")]
    Timeout(Duration),
    #[error("Provider answered with status {0}.")]
    Status(String),
    #[error("Malformed provider response: {0}")]
    Malformed(String),
    #[error("Provider returned no results.")]
    NoResults,
}

impl ProviderError {
    pub(crate) fn from_status(status: String, message: Option<String>) -> Self {
        match message {
            Some(message) => ProviderError::Status(format!("{} ({})", status, message)),
            None => ProviderError::Status(status),
        }
    }
}
