//! Epicenter, then grid search, then venue resolution.

use log::*;
use serde::Serialize;

use crate::services::{Coordinate, MappingProvider, TransportMode, TravelTime, Venue};
use crate::MeetPointError;

pub mod epicenter;
pub mod grid;
pub mod venue;

#[cfg(test)]
pub(crate) mod testing;

pub const MIN_PARTICIPANTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub address: String,
    pub mode: TransportMode,
}

impl Participant {
    pub fn new(address: impl Into<String>, mode: TransportMode) -> Self {
        Participant {
            address: address.into(),
            mode,
        }
    }
}

/// Tunables for where and how the search looks.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPolicy {
    /// Single combined term passed to the nearby search.
    pub keyword: String,
    pub radius_meters: u32,
    /// Spacing of the candidate grid, in degrees.
    pub grid_step: f64,
}

impl SearchPolicy {
    pub const DEFAULT_KEYWORD: &'static str = "bar café restaurant";
    pub const DEFAULT_RADIUS_METERS: u32 = 1500;
    pub const DEFAULT_GRID_STEP: f64 = 0.005;
}

impl Default for SearchPolicy {
    fn default() -> Self {
        SearchPolicy {
            keyword: Self::DEFAULT_KEYWORD.to_string(),
            radius_meters: Self::DEFAULT_RADIUS_METERS,
            grid_step: Self::DEFAULT_GRID_STEP,
        }
    }
}

/// The answer to a request. `travel_times` follows participant order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingPoint {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub travel_times: Vec<TravelTime>,
    pub mean_travel_time: TravelTime,
    pub place_id: Option<String>,
    pub unlocated_addresses: Vec<String>,
}

impl MeetingPoint {
    pub fn new(venue: Venue, travel_times: Vec<TravelTime>) -> Self {
        MeetingPoint {
            mean_travel_time: TravelTime::mean(&travel_times),
            name: venue.name,
            address: venue.address,
            coordinate: venue.coordinate,
            travel_times,
            place_id: venue.place_id,
            unlocated_addresses: Vec::new(),
        }
    }

    pub fn with_unlocated(mut self, unlocated: Vec<String>) -> Self {
        self.unlocated_addresses = unlocated;
        self
    }
}

/// Runs the whole pipeline against `provider`.
pub async fn compute_meeting_point<P>(
    provider: &P,
    participants: &[Participant],
    policy: &SearchPolicy,
) -> Result<MeetingPoint, MeetPointError>
where
    P: MappingProvider + ?Sized,
{
    let addresses: Vec<&str> = participants.iter().map(|p| p.address.as_str()).collect();
    let epicenter = epicenter::locate_epicenter(provider, addresses.as_slice()).await?;
    let best =
        grid::find_best_candidate(provider, participants, epicenter.coordinate, policy.grid_step)
            .await?;
    let meeting_point = venue::resolve_venue(provider, participants, best.coordinate, policy)
        .await
        .with_unlocated(epicenter.unlocated);
    info!(
        "Meeting point for {} participants: {:?} at {}.",
        participants.len(),
        meeting_point.name,
        meeting_point.coordinate
    );
    Ok(meeting_point)
}

/// A provider bundled with the policy it is searched with.
pub struct Planner<P> {
    provider: P,
    policy: SearchPolicy,
}

impl<P: MappingProvider> Planner<P> {
    pub fn new(provider: P, policy: SearchPolicy) -> Self {
        Planner { provider, policy }
    }

    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    pub async fn plan(&self, participants: &[Participant]) -> Result<MeetingPoint, MeetPointError> {
        compute_meeting_point(&self.provider, participants, &self.policy).await
    }
}
