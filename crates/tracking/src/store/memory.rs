//! In-memory store backed by routes loaded at startup.
//!
//! Stands in for the database: routes are read-only after construction and
//! bus bindings live only as long as the process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::identifiers::*;
use crate::models::{BusBinding, Route};
use crate::store::traits::{StoreFuture, TrackingStore};

/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone, Default)]
pub struct MemoryStore {
    routes: Arc<Vec<Route>>,
    route_map: Arc<HashMap<RouteIdentifier, Route>>,
    buses: Arc<RwLock<HashMap<BusIdentifier, BusBinding>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded routes
    ///
    /// A later route with a repeated id replaces the earlier one.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let mut route_map = HashMap::new();
        let mut order = Vec::new();
        for route in routes {
            if route_map.insert(route.id.clone(), route.clone()).is_none() {
                order.push(route.id);
            }
        }

        let routes = order
            .iter()
            .filter_map(|id| route_map.get(id).cloned())
            .collect();

        Self {
            routes: Arc::new(routes),
            route_map: Arc::new(route_map),
            buses: Arc::default(),
        }
    }
}

impl TrackingStore for MemoryStore {
    fn find_route<'a>(&'a self, route_id: &'a RouteIdentifier) -> StoreFuture<'a, Option<Route>> {
        Box::pin(async move { Ok(self.route_map.get(route_id).cloned()) })
    }

    fn all_routes(&self) -> StoreFuture<'_, Vec<Route>> {
        Box::pin(async move { Ok(self.routes.as_ref().clone()) })
    }

    fn find_bus<'a>(&'a self, bus_id: &'a BusIdentifier) -> StoreFuture<'a, Option<BusBinding>> {
        Box::pin(async move { Ok(self.buses.read().await.get(bus_id).cloned()) })
    }

    fn persist_bus_binding<'a>(&'a self, binding: &'a BusBinding) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.buses
                .write()
                .await
                .entry(binding.bus_id.clone())
                .or_insert_with(|| binding.clone());
            Ok(())
        })
    }

    fn bus_id_exists<'a>(&'a self, bus_id: &'a BusIdentifier) -> StoreFuture<'a, bool> {
        Box::pin(async move { Ok(self.buses.read().await.contains_key(bus_id)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stop;

    fn route(id: &str, name: &str) -> Route {
        Route::new(
            RouteIdentifier::new(id),
            name,
            vec![Stop::new("Depot", 0.0, 0.0, 1)],
            None,
        )
        .unwrap()
    }

    fn binding(bus: &str, route: &str) -> BusBinding {
        BusBinding {
            bus_id: BusIdentifier::parse(bus).unwrap(),
            route_id: RouteIdentifier::new(route),
            bus_number: bus.into(),
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        assert!(store.all_routes().await.unwrap().is_empty());
        assert!(store
            .find_route(&RouteIdentifier::new("r1"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_route_lookups() {
        let store = MemoryStore::from_routes(vec![route("r1", "Line 1"), route("r2", "Line 2")]);

        let found = store.find_route(&RouteIdentifier::new("r2")).await.unwrap();
        assert_eq!(found.map(|r| r.name.to_string()), Some("Line 2".to_string()));
        assert_eq!(store.all_routes().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_route_id_last_wins() {
        let store = MemoryStore::from_routes(vec![route("r1", "Old"), route("r1", "New")]);

        let routes = store.all_routes().await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(&*routes[0].name, "New");
    }

    #[tokio::test]
    async fn test_first_binding_is_kept() {
        let store = MemoryStore::new();
        let id = BusIdentifier::parse("AB12").unwrap();
        assert!(!store.bus_id_exists(&id).await.unwrap());

        store.persist_bus_binding(&binding("AB12", "r1")).await.unwrap();
        store.persist_bus_binding(&binding("AB12", "r2")).await.unwrap();

        assert!(store.bus_id_exists(&id).await.unwrap());
        let found = store.find_bus(&id).await.unwrap().unwrap();
        assert_eq!(found.route_id, RouteIdentifier::new("r1"));
        assert!(store.find_bus(&BusIdentifier::parse("CD34").unwrap()).await.unwrap().is_none());
    }
}
