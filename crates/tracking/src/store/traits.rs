//! Pluggable durable-store interface.
//!
//! Routes and bus bindings live outside the engine; external crates
//! implement this trait to back them with a real database.

use std::future::Future;
use std::pin::Pin;

use crate::identifiers::*;
use crate::models::{BusBinding, Result, Route};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Durable routes and bus bindings
///
/// Implementations report their own failures as [`TrackingError::Store`];
/// "not found" is `Ok(None)`, never an error.
///
/// [`TrackingError::Store`]: crate::models::TrackingError::Store
pub trait TrackingStore: Send + Sync {
    /// Look a route up by id
    fn find_route<'a>(&'a self, route_id: &'a RouteIdentifier) -> StoreFuture<'a, Option<Route>>;

    /// All known routes
    fn all_routes(&self) -> StoreFuture<'_, Vec<Route>>;

    /// Look up the durable binding of a bus id
    fn find_bus<'a>(&'a self, bus_id: &'a BusIdentifier) -> StoreFuture<'a, Option<BusBinding>>;

    /// Record a new binding
    fn persist_bus_binding<'a>(&'a self, binding: &'a BusBinding) -> StoreFuture<'a, ()>;

    /// Check whether an id already has a durable binding
    fn bus_id_exists<'a>(&'a self, bus_id: &'a BusIdentifier) -> StoreFuture<'a, bool>;
}
