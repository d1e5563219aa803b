//! Time-to-next-stop estimates, computed from a snapshot at read time.

use std::sync::Arc;

use crate::models::BusTrackingEntry;
use crate::spatial::queries::haversine_distance;

/// Assumed average bus speed: 30 km/h
pub const AVERAGE_SPEED_MPS: f64 = 30_000.0 / 3600.0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EtaEstimate {
    pub eta_seconds: Option<u64>,
    pub next_stop_name: Option<Arc<str>>,
}

/// Estimate the time until `entry` reaches its next stop.
///
/// Once the bus has reached the last stop the next stop stays the last
/// stop, so the estimate becomes the time back to the terminus.
pub fn estimate(entry: &BusTrackingEntry) -> EtaEstimate {
    let Some(location) = entry.current_location else {
        return EtaEstimate::default();
    };
    let Some(last_index) = entry.stops.len().checked_sub(1) else {
        return EtaEstimate::default();
    };

    let next_index = entry
        .current_stop_index
        .map_or(0, |i| i.saturating_add(1))
        .min(last_index);
    let next_stop = &entry.stops[next_index];

    let meters = haversine_distance(location, next_stop.location);
    let seconds = (meters / AVERAGE_SPEED_MPS).round().max(0.0);

    EtaEstimate {
        eta_seconds: Some(seconds as u64),
        next_stop_name: Some(next_stop.name.clone()),
    }
}
