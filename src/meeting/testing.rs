use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use super::Participant;
use crate::services::{
    Coordinate, GeocodingService, PlacesService, TransportMode, TravelTime, TravelTimeService,
    Venue,
};

type TravelTimeFn = Box<dyn Fn(&str, Coordinate, TransportMode) -> TravelTime + Send + Sync>;

/// In-memory provider that records what it was asked.
pub struct FakeProvider {
    addresses: HashMap<String, Coordinate>,
    travel_times: TravelTimeFn,
    venue: Option<Venue>,
    geocode_calls: AtomicUsize,
    destinations: Mutex<Vec<Coordinate>>,
    searches: Mutex<Vec<(Coordinate, String, u32)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        FakeProvider {
            addresses: HashMap::new(),
            travel_times: Box::new(|_, _, _| TravelTime::Unreachable),
            venue: None,
            geocode_calls: AtomicUsize::new(0),
            destinations: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_address(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.addresses.insert(address.to_string(), coordinate);
        self
    }

    pub fn with_travel_times<F>(mut self, travel_times: F) -> Self
    where
        F: Fn(&str, Coordinate, TransportMode) -> TravelTime + Send + Sync + 'static,
    {
        self.travel_times = Box::new(travel_times);
        self
    }

    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.venue = Some(venue);
        self
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn travel_time_calls(&self) -> usize {
        self.destinations.lock().unwrap().len()
    }

    pub fn destinations(&self) -> Vec<Coordinate> {
        self.destinations.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<(Coordinate, String, u32)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodingService for FakeProvider {
    async fn geocode(&self, address: &str) -> Option<Coordinate> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.get(address).copied()
    }
}

#[async_trait]
impl TravelTimeService for FakeProvider {
    async fn travel_time(
        &self,
        origin: &str,
        destination: Coordinate,
        mode: TransportMode,
    ) -> TravelTime {
        self.destinations.lock().unwrap().push(destination);
        (self.travel_times)(origin, destination, mode)
    }
}

#[async_trait]
impl PlacesService for FakeProvider {
    async fn nearby_search(
        &self,
        near: Coordinate,
        keyword: &str,
        radius_meters: u32,
    ) -> Option<Venue> {
        self.searches
            .lock()
            .unwrap()
            .push((near, keyword.to_string(), radius_meters));
        self.venue.clone()
    }
}

pub fn participants(people: &[(&str, TransportMode)]) -> Vec<Participant> {
    people
        .iter()
        .map(|(address, mode)| Participant::new(*address, *mode))
        .collect()
}

pub fn approx_eq(a: Coordinate, b: Coordinate) -> bool {
    (a.latitude - b.latitude).abs() < 1e-9 && (a.longitude - b.longitude).abs() < 1e-9
}
