//! Turns a raw position into an arrival status against a route's stops.

use geo::Point;

use crate::models::{BusStatus, Stop};
use crate::spatial::queries::haversine_distance;

/// A position closer than this to a stop counts as being at the stop
pub const ARRIVAL_THRESHOLD_M: f64 = 100.0;

/// Outcome of matching one position against a stop list.
#[derive(Clone, Debug, PartialEq)]
pub struct StopMatch {
    pub status: BusStatus,
    /// Index into the stop list of the matched stop
    pub stop_index: Option<usize>,
}

/// Match `position` against `stops`, which must be in travel order.
///
/// The first stop inside [`ARRIVAL_THRESHOLD_M`] wins even if a later stop
/// is closer.
pub fn match_stop(position: Point, stops: &[Stop]) -> StopMatch {
    let matched = stops
        .iter()
        .enumerate()
        .find(|(_, stop)| haversine_distance(position, stop.location) < ARRIVAL_THRESHOLD_M);

    match matched {
        Some((index, stop)) => StopMatch {
            status: BusStatus::ArrivedAt(stop.name.clone()),
            stop_index: Some(index),
        },
        None => StopMatch {
            status: BusStatus::OnRoute,
            stop_index: None,
        },
    }
}
