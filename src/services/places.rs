use super::{Coordinate, GoogleMapsService, ProviderError, Venue};

use async_trait::async_trait;
use log::*;
use serde::Deserialize;

#[async_trait]
pub trait PlacesService: Send + Sync {
    /// Top-ranked place matching `keyword` within `radius_meters` of `near`.
    async fn nearby_search(
        &self,
        near: Coordinate,
        keyword: &str,
        radius_meters: u32,
    ) -> Option<Venue>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    geometry: PlaceGeometry,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: PlaceLocation,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    lat: f64,
    lng: f64,
}

impl NearbySearchResponse {
    /// The first result, in the provider's own ranking.
    pub(crate) fn into_first_venue(self) -> Result<Option<Venue>, ProviderError> {
        if self.status == "ZERO_RESULTS" {
            return Ok(None);
        }
        if self.status != "OK" {
            return Err(ProviderError::from_status(self.status, self.error_message));
        }
        Ok(self.results.into_iter().next().map(|place| Venue {
            address: place
                .vicinity
                .or(place.formatted_address)
                .unwrap_or_default(),
            name: place.name,
            coordinate: Coordinate::new(place.geometry.location.lat, place.geometry.location.lng),
            place_id: place.place_id,
        }))
    }
}

#[async_trait]
impl PlacesService for GoogleMapsService {
    async fn nearby_search(
        &self,
        near: Coordinate,
        keyword: &str,
        radius_meters: u32,
    ) -> Option<Venue> {
        let location_param = near.to_string();
        let radius_param = radius_meters.to_string();
        let request = async {
            self.get_json::<NearbySearchResponse>(
                "place/nearbysearch/json",
                &[
                    ("location", location_param.as_str()),
                    ("radius", radius_param.as_str()),
                    ("keyword", keyword),
                ],
            )
            .await?
            .into_first_venue()
        };
        match self.with_deadline(request).await {
            Ok(venue) => {
                trace!("Nearby search around {} returned {:?}.", near, venue);
                venue
            }
            Err(why) => {
                warn!("Nearby search around {} failed: {}", near, why);
                None
            }
        }
    }
}
