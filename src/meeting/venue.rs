use log::*;

use super::{grid::travel_times_to, MeetingPoint, Participant, SearchPolicy};
use crate::services::{Coordinate, PlacesService, TravelTimeService, Venue};

/// Finds a venue near `candidate`, or a placeholder at `candidate` itself.
pub async fn find_venue<P>(places: &P, candidate: Coordinate, policy: &SearchPolicy) -> Venue
where
    P: PlacesService + ?Sized,
{
    match places
        .nearby_search(candidate, &policy.keyword, policy.radius_meters)
        .await
    {
        Some(venue) => {
            debug!("Found venue {:?} at {}.", venue.name, venue.coordinate);
            venue
        }
        None => {
            debug!("No venue near {}, using the grid point.", candidate);
            Venue::placeholder(candidate)
        }
    }
}

/// Resolves the winning grid point to a venue and measures everyone's trip
/// to the venue itself, which may sit a few hundred metres off the grid.
pub async fn resolve_venue<P>(
    provider: &P,
    participants: &[Participant],
    candidate: Coordinate,
    policy: &SearchPolicy,
) -> MeetingPoint
where
    P: PlacesService + TravelTimeService + ?Sized,
{
    let venue = find_venue(provider, candidate, policy).await;
    let travel_times = travel_times_to(provider, participants, venue.coordinate).await;
    MeetingPoint::new(venue, travel_times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::testing::{participants, FakeProvider};
    use crate::services::{TransportMode, TravelTime};

    #[tokio::test]
    async fn placeholder_sits_on_the_candidate() {
        let provider = FakeProvider::new().with_travel_times(|_, _, _| TravelTime::Seconds(10.0));
        let people = participants(&[("A", TransportMode::Walking), ("B", TransportMode::Walking)]);
        let candidate = Coordinate::new(52.52, 13.405);

        let point = resolve_venue(&provider, &people, candidate, &SearchPolicy::default()).await;

        assert_eq!(point.name, "Meeting Point");
        assert_eq!(point.address, "No venue found");
        assert_eq!(point.coordinate, candidate);
        assert_eq!(point.place_id, None);
        assert_eq!(point.mean_travel_time, TravelTime::Seconds(10.0));
    }

    #[tokio::test]
    async fn searches_with_the_policy_keyword_and_radius() {
        let provider = FakeProvider::new();
        let policy = SearchPolicy {
            keyword: "library".to_string(),
            radius_meters: 800,
            ..SearchPolicy::default()
        };
        let candidate = Coordinate::new(1.0, 1.0);
        find_venue(&provider, candidate, &policy).await;
        assert_eq!(
            provider.searches(),
            vec![(candidate, "library".to_string(), 800)]
        );
    }

    #[tokio::test]
    async fn recomputes_travel_times_against_the_venue() {
        let venue = Venue {
            name: "Joe's Café".to_string(),
            address: "12 High Street".to_string(),
            coordinate: Coordinate::new(10.006, 20.004),
            place_id: Some("xyz123".to_string()),
        };
        let provider = FakeProvider::new()
            .with_venue(venue.clone())
            .with_travel_times(|origin, _, _| match origin {
                "A" => TravelTime::Seconds(300.0),
                _ => TravelTime::Unreachable,
            });
        let people = participants(&[("A", TransportMode::Driving), ("B", TransportMode::Transit)]);

        let point = resolve_venue(
            &provider,
            &people,
            Coordinate::new(10.005, 20.005),
            &SearchPolicy::default(),
        )
        .await;

        assert_eq!(point.name, "Joe's Café");
        assert_eq!(point.address, "12 High Street");
        assert_eq!(point.place_id.as_deref(), Some("xyz123"));
        assert_eq!(point.coordinate, venue.coordinate);
        assert_eq!(point.travel_times, vec![TravelTime::Seconds(300.0), TravelTime::Unreachable]);
        assert_eq!(point.mean_travel_time, TravelTime::Seconds(300.0));
        assert_eq!(provider.destinations(), vec![venue.coordinate, venue.coordinate]);
    }
}
