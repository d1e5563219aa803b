//! Live state of one tracked bus.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::Point;

use crate::identifiers::*;
use crate::models::route::Stop;

/// Everything the registry knows about a bus.
///
/// Descriptive fields and `stops` are fixed at registration; only the
/// location, progress and timestamp move afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct BusTrackingEntry {
    pub bus_id: BusIdentifier,
    pub route_id: RouteIdentifier,
    pub route_name: Arc<str>,
    pub bus_number: Arc<str>,
    pub stops: Arc<[Stop]>,

    /// x is longitude, y is latitude; `None` until the first update
    pub current_location: Option<Point>,
    /// Furthest stop reached so far; `None` until the bus is near any stop
    pub current_stop_index: Option<usize>,
    pub last_update: Option<DateTime<Utc>>,
}

impl BusTrackingEntry {
    pub fn new(registration: BusRegistration) -> Self {
        Self {
            bus_id: registration.bus_id,
            route_id: registration.route_id,
            route_name: registration.route_name,
            bus_number: registration.bus_number,
            stops: registration.stops,
            current_location: None,
            current_stop_index: None,
            last_update: None,
        }
    }

    /// Stop index in wire form, with -1 meaning "not yet near any stop".
    pub fn current_stop_index_or_sentinel(&self) -> i64 {
        self.current_stop_index.map_or(-1, |i| i as i64)
    }

    /// Move progress forward to `candidate`; never moves it backward.
    ///
    /// Returns true if the stored index changed.
    pub(crate) fn advance_to(&mut self, candidate: Option<usize>) -> bool {
        if candidate > self.current_stop_index {
            self.current_stop_index = candidate;
            true
        } else {
            false
        }
    }
}

/// Immutable fields a registration copies into a new entry.
#[derive(Clone, Debug)]
pub struct BusRegistration {
    pub bus_id: BusIdentifier,
    pub route_id: RouteIdentifier,
    pub route_name: Arc<str>,
    pub bus_number: Arc<str>,
    pub stops: Arc<[Stop]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> BusTrackingEntry {
        BusTrackingEntry::new(BusRegistration {
            bus_id: BusIdentifier::parse("AB12").unwrap(),
            route_id: RouteIdentifier::new("r1"),
            route_name: "Line 1".into(),
            bus_number: "AB12".into(),
            stops: vec![Stop::new("Depot", 0.0, 0.0, 1)].into(),
        })
    }

    #[test]
    fn test_new_entry_is_blank() {
        let e = entry();
        assert_eq!(e.current_location, None);
        assert_eq!(e.current_stop_index, None);
        assert_eq!(e.current_stop_index_or_sentinel(), -1);
        assert_eq!(e.last_update, None);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut e = entry();

        assert!(e.advance_to(Some(0)));
        assert!(e.advance_to(Some(2)));
        assert!(!e.advance_to(Some(1)));
        assert!(!e.advance_to(None));
        assert!(!e.advance_to(Some(2)));
        assert_eq!(e.current_stop_index_or_sentinel(), 2);
    }
}
