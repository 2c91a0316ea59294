use futures_util::future::join_all;
use log::*;

use super::Participant;
use crate::services::{Coordinate, TravelTime, TravelTimeService};
use crate::MeetPointError;

/// Offsets, in grid steps, along each axis.
const OFFSETS: [i32; 3] = [-1, 0, 1];

/// A grid point together with how long everyone takes to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub coordinate: Coordinate,
    pub travel_times: Vec<TravelTime>,
    pub mean_travel_time: TravelTime,
}

/// The 3x3 neighbourhood of `center`, latitude offset outer and longitude
/// offset inner. Selection relies on this order to break ties.
pub fn candidate_grid(center: Coordinate, step: f64) -> Vec<Coordinate> {
    OFFSETS
        .iter()
        .flat_map(|&i| {
            OFFSETS
                .iter()
                .map(move |&j| center.offset(i as f64 * step, j as f64 * step))
        })
        .collect()
}

/// Travel time from each participant to `destination`, in participant order.
pub async fn travel_times_to<T>(
    router: &T,
    participants: &[Participant],
    destination: Coordinate,
) -> Vec<TravelTime>
where
    T: TravelTimeService + ?Sized,
{
    join_all(
        participants
            .iter()
            .map(|p| router.travel_time(&p.address, destination, p.mode)),
    )
    .await
}

pub async fn score_candidate<T>(
    router: &T,
    participants: &[Participant],
    coordinate: Coordinate,
) -> Candidate
where
    T: TravelTimeService + ?Sized,
{
    let travel_times = travel_times_to(router, participants, coordinate).await;
    let mean_travel_time = TravelTime::mean(&travel_times);
    Candidate {
        coordinate,
        travel_times,
        mean_travel_time,
    }
}

/// Lowest mean travel time wins; on a tie the earlier candidate is kept.
/// Candidates nobody can reach are never selected.
pub fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut best: Option<(f64, Candidate)> = None;
    for candidate in candidates {
        let Some(mean) = candidate.mean_travel_time.seconds() else {
            continue;
        };
        match &best {
            Some((best_mean, _)) if mean >= *best_mean => {}
            _ => best = Some((mean, candidate)),
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Scores every grid point around `epicenter` concurrently and picks the best.
pub async fn find_best_candidate<T>(
    router: &T,
    participants: &[Participant],
    epicenter: Coordinate,
    step: f64,
) -> Result<Candidate, MeetPointError>
where
    T: TravelTimeService + ?Sized,
{
    let grid = candidate_grid(epicenter, step);
    let candidates = join_all(
        grid.into_iter()
            .map(|coordinate| score_candidate(router, participants, coordinate)),
    )
    .await;
    for candidate in &candidates {
        trace!(
            "Candidate {} has mean travel time {:?}.",
            candidate.coordinate,
            candidate.mean_travel_time
        );
    }

    let best = select_best(candidates).ok_or(MeetPointError::NoReachableCandidate)?;
    debug!(
        "Best candidate {} with mean travel time {:?}.",
        best.coordinate, best.mean_travel_time
    );
    Ok(best)
}
