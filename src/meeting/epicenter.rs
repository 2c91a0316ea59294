use futures_util::future::join_all;
use log::*;

use crate::services::{Coordinate, GeocodingService};
use crate::MeetPointError;

/// Mean position of every address that could be located.
#[derive(Debug, Clone, PartialEq)]
pub struct Epicenter {
    pub coordinate: Coordinate,
    /// Addresses the geocoder could not resolve, in input order.
    pub unlocated: Vec<String>,
}

/// Geocodes all `addresses` concurrently and averages the successes.
///
/// Failed lookups are dropped; only when none succeeds is the whole
/// request failed.
pub async fn locate_epicenter<G, A>(
    geocoder: &G,
    addresses: &[A],
) -> Result<Epicenter, MeetPointError>
where
    G: GeocodingService + ?Sized,
    A: AsRef<str>,
{
    let lookups = addresses
        .iter()
        .map(|address| geocoder.geocode(address.as_ref()));
    let results = join_all(lookups).await;

    let mut located = Vec::with_capacity(results.len());
    let mut unlocated = Vec::new();
    for (address, result) in addresses.iter().zip(results) {
        match result {
            Some(coordinate) => located.push(coordinate),
            None => unlocated.push(address.as_ref().to_string()),
        }
    }
    if !unlocated.is_empty() {
        debug!("Could not locate {} of {} addresses.", unlocated.len(), addresses.len());
    }

    let coordinate = mean_coordinate(&located).ok_or(MeetPointError::EpicenterUnavailable)?;
    debug!("Epicenter at {}.", coordinate);
    Ok(Epicenter {
        coordinate,
        unlocated,
    })
}

pub fn mean_coordinate(coordinates: &[Coordinate]) -> Option<Coordinate> {
    if coordinates.is_empty() {
        return None;
    }
    let n = coordinates.len() as f64;
    let latitude = coordinates.iter().map(|c| c.latitude).sum::<f64>() / n;
    let longitude = coordinates.iter().map(|c| c.longitude).sum::<f64>() / n;
    Some(Coordinate::new(latitude, longitude))
}
