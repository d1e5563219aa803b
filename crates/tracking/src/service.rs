//! Orchestration of the registry, the durable store, and the id allocator.
//!
//! This is what request handlers talk to: it owns the registry and decides
//! how a registration request maps onto live and durable state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::allocator::IdAllocator;
use crate::eta::{estimate, EtaEstimate};
use crate::identifiers::*;
use crate::models::{BusBinding, BusRegistration, BusTrackingEntry, Result, Route, TrackingError};
use crate::registry::{LocationUpdate, TrackingRegistry};
use crate::store::TrackingStore;

/// Outcome of [`TrackingService::register_bus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusRegistered {
    pub bus_id: BusIdentifier,
    pub route_id: RouteIdentifier,
    /// The id already had a live entry; nothing changed
    pub already_registered: bool,
    /// The live entry was rebuilt from an existing durable binding
    pub rehydrated: bool,
}

/// A live entry together with its freshly computed ETA.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedBus {
    pub entry: BusTrackingEntry,
    pub eta: EtaEstimate,
}

impl From<BusTrackingEntry> for TrackedBus {
    fn from(entry: BusTrackingEntry) -> Self {
        let eta = estimate(&entry);
        Self { entry, eta }
    }
}

pub struct TrackingService {
    registry: TrackingRegistry,
    store: Arc<dyn TrackingStore>,
    allocator: IdAllocator,
    registering: Mutex<HashMap<BusIdentifier, Arc<Mutex<()>>>>,
}

impl TrackingService {
    pub fn new(store: Arc<dyn TrackingStore>) -> Self {
        Self {
            registry: TrackingRegistry::new(),
            store,
            allocator: IdAllocator::new(),
            registering: Mutex::default(),
        }
    }

    pub fn with_allocator(mut self, allocator: IdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn registry(&self) -> &TrackingRegistry {
        &self.registry
    }

    /// Bind `bus_id` to `route_id` and make it live.
    ///
    /// Re-registering a live bus on the same route is a no-op. A bus whose
    /// durable binding exists is rehydrated from it. Binding a bus that is
    /// live on, or durably bound to, another route is a conflict. A
    /// rehydrated bus keeps its stored number; `bus_number` only applies to
    /// first registrations. The durable binding is written before the registry is touched, so a store
    /// failure leaves no live entry behind.
    pub async fn register_bus(
        &self,
        bus_id: &BusIdentifier,
        route_id: &RouteIdentifier,
        bus_number: Option<&str>,
    ) -> Result<BusRegistered> {
        let _guard = self.registration_guard(bus_id).await;

        let route = self
            .store
            .find_route(route_id)
            .await?
            .ok_or_else(|| TrackingError::RouteNotFound(route_id.clone()))?;

        if let Ok(live) = self.registry.get(bus_id).await {
            ensure_same_route(bus_id, &live.route_id, route_id)?;
            return Ok(BusRegistered {
                bus_id: bus_id.clone(),
                route_id: live.route_id,
                already_registered: true,
                rehydrated: false,
            });
        }

        let requested_number = bus_number.map(str::trim).filter(|s| !s.is_empty());

        let (bus_number, rehydrated): (Arc<str>, bool) = match self.store.find_bus(bus_id).await? {
            Some(binding) => {
                ensure_same_route(bus_id, &binding.route_id, route_id)?;
                (binding.bus_number, true)
            }
            None => {
                let number: Arc<str> = requested_number.unwrap_or(bus_id.as_str()).into();
                let binding = BusBinding {
                    bus_id: bus_id.clone(),
                    route_id: route.id.clone(),
                    bus_number: number.clone(),
                };
                self.store.persist_bus_binding(&binding).await.map_err(|e| {
                    tracing::error!(bus_id = %bus_id, error = %e, "Failed to persist bus binding");
                    e
                })?;
                (number, false)
            }
        };

        let outcome = self.registry.register(registration(bus_id, &route, bus_number)).await;
        if outcome.already_existed {
            ensure_same_route(bus_id, &outcome.route_id, route_id)?;
        }

        if rehydrated {
            tracing::info!(bus_id = %bus_id, route_id = %route_id, "Rehydrated bus from stored binding");
        }

        Ok(BusRegistered {
            bus_id: bus_id.clone(),
            route_id: outcome.route_id,
            already_registered: outcome.already_existed,
            rehydrated,
        })
    }

    /// Allocate an id unknown to both the registry and the store.
    pub async fn generate_bus_id(&self) -> Result<BusIdentifier> {
        self.allocator.allocate(&self.registry, self.store.as_ref()).await
    }

    /// Durable binding of `bus_id` and the route it points at.
    pub async fn lookup_bus(&self, bus_id: &BusIdentifier) -> Result<(BusBinding, Route)> {
        let binding = self
            .store
            .find_bus(bus_id)
            .await?
            .ok_or_else(|| TrackingError::BusNotFound(bus_id.clone()))?;

        let route = self
            .store
            .find_route(&binding.route_id)
            .await?
            .ok_or_else(|| TrackingError::RouteNotFound(binding.route_id.clone()))?;

        Ok((binding, route))
    }

    pub async fn routes(&self) -> Result<Vec<Route>> {
        self.store.all_routes().await
    }

    pub async fn update_location(
        &self,
        bus_id: &BusIdentifier,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationUpdate> {
        self.registry.update_location(bus_id, latitude, longitude).await
    }

    pub async fn bus_location(&self, bus_id: &BusIdentifier) -> Result<TrackedBus> {
        self.registry.get(bus_id).await.map(TrackedBus::from)
    }

    pub async fn live_buses(&self) -> Vec<TrackedBus> {
        self.registry
            .list()
            .await
            .into_iter()
            .map(TrackedBus::from)
            .collect()
    }

    /// Serialize registrations of the same id; other ids are unaffected.
    async fn registration_guard(&self, bus_id: &BusIdentifier) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.registering.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(bus_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

fn registration(bus_id: &BusIdentifier, route: &Route, bus_number: Arc<str>) -> BusRegistration {
    BusRegistration {
        bus_id: bus_id.clone(),
        route_id: route.id.clone(),
        route_name: route.name.clone(),
        bus_number,
        stops: route.stops.clone(),
    }
}

fn ensure_same_route(
    bus_id: &BusIdentifier,
    bound_to: &RouteIdentifier,
    requested: &RouteIdentifier,
) -> Result<()> {
    if bound_to == requested {
        Ok(())
    } else {
        tracing::warn!(
            bus_id = %bus_id,
            bound_to = %bound_to,
            requested = %requested,
            "Rejected registration on a different route"
        );
        Err(TrackingError::Conflict {
            bus_id: bus_id.clone(),
            bound_to: bound_to.clone(),
            requested: requested.clone(),
        })
    }
}
