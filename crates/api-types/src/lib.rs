//! JSON bodies exchanged with driver and rider clients.
//!
//! Field names are camelCase on the wire. Absent values serialize as
//! `null` rather than being omitted, so clients can rely on every key being
//! present.

use serde::{Deserialize, Serialize};

// ============================================================================
// Shared pieces
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// A stop as held by a live bus
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopView {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub order: u32,
}

/// A stop in route documents, in the shape routes are stored with
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub stop_order: u32,
}

/// Every failure response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

// ============================================================================
// Driver side
// ============================================================================

/// `POST /api/register-bus`
///
/// Required fields are optional here so a missing one can be reported with
/// a specific message instead of a generic parse failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBusRequest {
    #[serde(default)]
    pub bus_id: Option<String>,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub bus_number: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBusResponse {
    pub success: bool,
    pub bus_id: String,
    pub route_id: String,
}

/// `GET /api/generate-bus-id`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateBusIdResponse {
    pub id: String,
}

/// `POST /api/update-location`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    #[serde(default)]
    pub bus_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationResponse {
    pub bus_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// "On Route" or "Arrived at <stop>"
    pub status: String,
    /// -1 until the bus has been near a stop
    pub current_stop_index: i64,
}

/// `GET /api/bus-lookup/{busId}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusLookupResponse {
    pub bus_id: String,
    pub route_id: String,
    pub route_name: String,
}

// ============================================================================
// Rider side
// ============================================================================

/// `GET /api/bus-location/{busId}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusLocationResponse {
    pub bus_id: String,
    pub route_id: String,
    pub route_name: String,
    pub bus_number: String,
    pub current_location: Option<LatLon>,
    pub stops: Vec<StopView>,
    pub current_stop_index: i64,
    pub eta_seconds: Option<u64>,
    /// Milliseconds since the Unix epoch
    pub last_update: Option<i64>,
}

/// One element of `GET /api/live-buses`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBus {
    pub bus_id: String,
    pub route_id: String,
    pub route_name: String,
    pub bus_number: String,
    pub current_stop_index: i64,
    pub eta_seconds: Option<u64>,
    pub next_stop_name: Option<String>,
    pub last_update: Option<i64>,
}

/// One element of `GET /api/routes`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub id: String,
    pub name: String,
    pub stops: Vec<RouteStop>,
    pub distance: Option<f64>,
}

// ============================================================================
// Route seed file
// ============================================================================

/// One route in the JSON seed file loaded at startup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    pub id: String,
    pub route_name: String,
    #[serde(default)]
    pub distance_km: Option<f64>,
    pub stops: Vec<RouteStop>,
}
