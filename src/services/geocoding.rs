use super::{Coordinate, GoogleMapsService, ProviderError};

use async_trait::async_trait;
use log::*;
use rust_decimal::{prelude::ToPrimitive, Decimal};

#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Resolves `address` to a coordinate, or `None` if it cannot be located.
    async fn geocode(&self, address: &str) -> Option<Coordinate>;
}

#[async_trait]
impl GeocodingService for GoogleMapsService {
    async fn geocode(&self, address: &str) -> Option<Coordinate> {
        match self.with_deadline(self.lookup_address(address)).await {
            Ok(coordinate) => {
                trace!("Geocoded {:?} to {}.", address, coordinate);
                Some(coordinate)
            }
            Err(why) => {
                warn!("Could not geocode {:?}: {}", address, why);
                None
            }
        }
    }
}

impl GoogleMapsService {
    async fn lookup_address(&self, address: &str) -> Result<Coordinate, ProviderError> {
        let response = self
            .client
            .geocoding()
            .with_address(address)
            .execute()
            .await
            .map_err(|why| ProviderError::Geocoding(why.to_string()))?;
        let location = &response
            .results
            .first()
            .ok_or(ProviderError::NoResults)?
            .geometry
            .location;
        trace!("Received coordinates from Google Maps geocoding API.");
        coordinate_from_decimal(location.lat, location.lng)
    }
}

pub(crate) fn coordinate_from_decimal(
    lat: Decimal,
    lng: Decimal,
) -> Result<Coordinate, ProviderError> {
    match (lat.to_f64(), lng.to_f64()) {
        (Some(latitude), Some(longitude)) => Ok(Coordinate::new(latitude, longitude)),
        _ => Err(ProviderError::Malformed(format!(
            "coordinates {},{} do not fit in f64",
            lat, lng
        ))),
    }
}
