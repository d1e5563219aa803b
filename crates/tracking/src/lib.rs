//! # where-is-bus-tracking
//!
//! Live tracking engine for buses on fixed routes.
//!
//! ## Features
//!
//! - **Live registry**: per-bus state behind per-entry locks
//! - **Stop matching**: Haversine distance with a 100 m arrival radius
//! - **Monotonic progress**: a bus's stop index never moves backward
//! - **ETA on read**: seconds to the next stop at an assumed 30 km/h
//! - **Short ids**: 4-character ids checked against live and durable state
//! - **Pluggable storage**: implement [`store::TrackingStore`] for your database
//!
//! Live state is process-local and lost on restart. Buses re-register, and
//! may be rehydrated from their durable route binding, but never from a last
//! known position.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use where_is_bus_tracking::prelude::*;
//!
//! # tokio_test_block(async {
//! let route = Route::new(
//!     RouteIdentifier::new("r1"),
//!     "Harbour Line",
//!     vec![
//!         Stop::new("Depot", 0.0, 0.0, 1),
//!         Stop::new("Market", 0.0, 0.001, 2),
//!     ],
//!     None,
//! )
//! .unwrap();
//!
//! let service = TrackingService::new(Arc::new(MemoryStore::from_routes(vec![route])));
//! let bus = BusIdentifier::parse("AB12").unwrap();
//! service.register_bus(&bus, &RouteIdentifier::new("r1"), None).await.unwrap();
//!
//! let update = service.update_location(&bus, 0.0, 0.0009).await.unwrap();
//! assert_eq!(update.status.to_string(), "Arrived at Market");
//! assert_eq!(update.current_stop_index, Some(1));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod allocator;
pub mod eta;
pub mod identifiers;
pub mod models;
pub mod registry;
pub mod service;
pub mod spatial;
pub mod store;

// Re-exports for convenience
pub mod prelude {
    pub use crate::allocator::{IdAllocator, DEFAULT_MAX_ATTEMPTS};
    pub use crate::eta::{estimate, EtaEstimate, AVERAGE_SPEED_MPS};
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::registry::{LocationUpdate, RegisterOutcome, TrackingRegistry};
    pub use crate::service::{BusRegistered, TrackedBus, TrackingService};
    pub use crate::spatial::{haversine_distance, match_stop, StopMatch, ARRIVAL_THRESHOLD_M};
    pub use crate::store::{MemoryStore, StoreFuture, TrackingStore};
}

pub use prelude::*;
