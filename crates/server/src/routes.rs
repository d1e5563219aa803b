use std::sync::Arc;

use api_types::{
    BusLocationResponse, BusLookupResponse, GenerateBusIdResponse, LiveBus, RegisterBusRequest,
    RegisterBusResponse, RouteSummary, UpdateLocationRequest, UpdateLocationResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use where_is_bus_tracking::{BusIdentifier, RouteIdentifier, TrackingService};

use crate::error::ApiError;
use crate::views;

type AppState = Arc<TrackingService>;

pub fn create_router(service: Arc<TrackingService>) -> Router {
    Router::new()
        .route("/api/register-bus", post(register_bus))
        .route("/api/generate-bus-id", get(generate_bus_id))
        .route("/api/update-location", post(update_location))
        .route("/api/bus-location/{bus_id}", get(bus_location))
        .route("/api/live-buses", get(live_buses))
        .route("/api/bus-lookup/{bus_id}", get(bus_lookup))
        .route("/api/routes", get(list_routes))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(service)
}

async fn register_bus(
    State(service): State<AppState>,
    payload: Result<Json<RegisterBusRequest>, JsonRejection>,
) -> Result<Json<RegisterBusResponse>, ApiError> {
    let Json(request) = payload?;

    let (Some(bus_id), Some(route_id)) = (non_blank(&request.bus_id), non_blank(&request.route_id))
    else {
        return Err(ApiError::Validation("busId and routeId are required".into()));
    };

    let bus_id = BusIdentifier::parse(bus_id)?;
    let route_id = RouteIdentifier::new(route_id);

    let registered = service
        .register_bus(&bus_id, &route_id, request.bus_number.as_deref())
        .await?;

    Ok(Json(RegisterBusResponse {
        success: true,
        bus_id: registered.bus_id.to_string(),
        route_id: registered.route_id.to_string(),
    }))
}

async fn generate_bus_id(
    State(service): State<AppState>,
) -> Result<Json<GenerateBusIdResponse>, ApiError> {
    let id = service.generate_bus_id().await?;
    Ok(Json(GenerateBusIdResponse { id: id.to_string() }))
}

async fn update_location(
    State(service): State<AppState>,
    payload: Result<Json<UpdateLocationRequest>, JsonRejection>,
) -> Result<Json<UpdateLocationResponse>, ApiError> {
    let Json(request) = payload?;

    let (Some(bus_id), Some(latitude), Some(longitude)) =
        (non_blank(&request.bus_id), request.latitude, request.longitude)
    else {
        return Err(ApiError::Validation(
            "busId, latitude and longitude are required".into(),
        ));
    };

    let bus_id = BusIdentifier::parse(bus_id)?;
    let update = service.update_location(&bus_id, latitude, longitude).await?;
    if update.advanced {
        tracing::info!(
            bus_id = %bus_id,
            current_stop_index = update.current_stop_index_or_sentinel(),
            status = %update.status,
            "Bus reached stop"
        );
    }

    Ok(Json(views::location_update(&update)))
}

async fn bus_location(
    State(service): State<AppState>,
    Path(bus_id): Path<String>,
) -> Result<Json<BusLocationResponse>, ApiError> {
    let bus_id = path_bus_id(&bus_id)?;
    let tracked = service.bus_location(&bus_id).await?;
    Ok(Json(views::bus_location(&tracked)))
}

async fn live_buses(State(service): State<AppState>) -> Json<Vec<LiveBus>> {
    let buses = service.live_buses().await;
    Json(buses.iter().map(views::live_bus).collect())
}

async fn bus_lookup(
    State(service): State<AppState>,
    Path(bus_id): Path<String>,
) -> Result<Json<BusLookupResponse>, ApiError> {
    let bus_id = path_bus_id(&bus_id)?;
    let (binding, route) = service.lookup_bus(&bus_id).await?;

    Ok(Json(BusLookupResponse {
        bus_id: binding.bus_id.to_string(),
        route_id: route.id.to_string(),
        route_name: route.name.to_string(),
    }))
}

async fn list_routes(
    State(service): State<AppState>,
) -> Result<Json<Vec<RouteSummary>>, ApiError> {
    let routes = service.routes().await?;
    Ok(Json(routes.iter().map(views::route_summary).collect()))
}

async fn health() -> &'static str {
    "OK"
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// An id in the path that cannot be a bus id names no bus.
fn path_bus_id(raw: &str) -> Result<BusIdentifier, ApiError> {
    BusIdentifier::parse(raw).map_err(|_| ApiError::NotFound(format!("Bus not found: {raw}")))
}
