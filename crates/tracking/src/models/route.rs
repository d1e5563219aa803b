//! Route and stop records as handed over by the durable store.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;
use crate::models::types::{Result, TrackingError};

/// A named waypoint on a route.
///
/// `location` follows the `geo` convention: x is longitude, y is latitude.
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub name: Arc<str>,
    pub location: Point,
    /// 1-based position along the route
    pub order: u32,
}

impl Stop {
    pub fn new(name: impl AsRef<str>, latitude: f64, longitude: f64, order: u32) -> Self {
        Self {
            name: name.as_ref().into(),
            location: Point::new(longitude, latitude),
            order,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }
}

/// A fixed bus route with its stops in travel order.
#[derive(Clone, Debug)]
pub struct Route {
    pub id: RouteIdentifier,
    pub name: Arc<str>,
    pub stops: Arc<[Stop]>,
    pub distance_km: Option<f64>,
}

impl Route {
    /// Build a route, putting stops in ascending `order`.
    ///
    /// Fails on an empty name, a zero or repeated order, or a stop with
    /// non-finite coordinates.
    pub fn new(
        id: RouteIdentifier,
        name: impl AsRef<str>,
        mut stops: Vec<Stop>,
        distance_km: Option<f64>,
    ) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(TrackingError::InvalidData(format!(
                "Route {} has an empty name",
                id
            )));
        }

        stops.sort_by_key(|s| s.order);

        for stop in &stops {
            if stop.order == 0 {
                return Err(TrackingError::InvalidData(format!(
                    "Stop {} on route {} has order 0 (orders are 1-based)",
                    stop.name, id
                )));
            }
            if !stop.latitude().is_finite() || !stop.longitude().is_finite() {
                return Err(TrackingError::InvalidData(format!(
                    "Stop {} on route {} has non-finite coordinates",
                    stop.name, id
                )));
            }
        }

        if let Some(pair) = stops.windows(2).find(|w| w[0].order == w[1].order) {
            return Err(TrackingError::InvalidData(format!(
                "Stops {} and {} on route {} share order {}",
                pair[0].name, pair[1].name, id, pair[0].order
            )));
        }

        Ok(Self {
            id,
            name: name.into(),
            stops: stops.into(),
            distance_km,
        })
    }
}

/// Durable binding of a bus id to a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusBinding {
    pub bus_id: BusIdentifier,
    pub route_id: RouteIdentifier,
    pub bus_number: Arc<str>,
}
