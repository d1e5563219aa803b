//! Conversions between engine types and wire bodies.

use api_types::{
    BusLocationResponse, LatLon, LiveBus, RouteDocument, RouteStop, RouteSummary, StopView,
    UpdateLocationResponse,
};
use where_is_bus_tracking::{
    LocationUpdate, Result, Route, RouteIdentifier, Stop, TrackedBus,
};

pub fn bus_location(tracked: &TrackedBus) -> BusLocationResponse {
    let entry = &tracked.entry;

    BusLocationResponse {
        bus_id: entry.bus_id.to_string(),
        route_id: entry.route_id.to_string(),
        route_name: entry.route_name.to_string(),
        bus_number: entry.bus_number.to_string(),
        current_location: entry.current_location.map(|p| LatLon {
            lat: p.y(),
            lon: p.x(),
        }),
        stops: entry.stops.iter().map(stop_view).collect(),
        current_stop_index: entry.current_stop_index_or_sentinel(),
        eta_seconds: tracked.eta.eta_seconds,
        last_update: entry.last_update.map(|t| t.timestamp_millis()),
    }
}

pub fn live_bus(tracked: &TrackedBus) -> LiveBus {
    let entry = &tracked.entry;

    LiveBus {
        bus_id: entry.bus_id.to_string(),
        route_id: entry.route_id.to_string(),
        route_name: entry.route_name.to_string(),
        bus_number: entry.bus_number.to_string(),
        current_stop_index: entry.current_stop_index_or_sentinel(),
        eta_seconds: tracked.eta.eta_seconds,
        next_stop_name: tracked.eta.next_stop_name.as_deref().map(str::to_string),
        last_update: entry.last_update.map(|t| t.timestamp_millis()),
    }
}

pub fn location_update(update: &LocationUpdate) -> UpdateLocationResponse {
    UpdateLocationResponse {
        bus_id: update.bus_id.to_string(),
        latitude: update.location.y(),
        longitude: update.location.x(),
        status: update.status.to_string(),
        current_stop_index: update.current_stop_index_or_sentinel(),
    }
}

pub fn route_summary(route: &Route) -> RouteSummary {
    RouteSummary {
        id: route.id.to_string(),
        name: route.name.to_string(),
        stops: route.stops.iter().map(route_stop).collect(),
        distance: route.distance_km,
    }
}

pub fn route_from_document(doc: RouteDocument) -> Result<Route> {
    let stops = doc
        .stops
        .into_iter()
        .map(|s| Stop::new(s.stop_name, s.latitude, s.longitude, s.stop_order))
        .collect();

    Route::new(RouteIdentifier::new(doc.id), doc.route_name, stops, doc.distance_km)
}

fn stop_view(stop: &Stop) -> StopView {
    StopView {
        name: stop.name.to_string(),
        lat: stop.latitude(),
        lon: stop.longitude(),
        order: stop.order,
    }
}

fn route_stop(stop: &Stop) -> RouteStop {
    RouteStop {
        stop_name: stop.name.to_string(),
        latitude: stop.latitude(),
        longitude: stop.longitude(),
        stop_order: stop.order,
    }
}
