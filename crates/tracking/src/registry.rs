//! The authoritative in-memory registry of live bus state.
//!
//! The map itself sits behind a `RwLock` that is only held long enough to
//! insert a key or clone an entry handle. Each entry has its own `Mutex`, so
//! updates to one bus are serialized while different buses proceed
//! independently. Nothing here survives a restart.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use geo::Point;
use tokio::sync::{Mutex, RwLock};

use crate::identifiers::*;
use crate::models::{BusRegistration, BusStatus, BusTrackingEntry, Result, TrackingError};
use crate::spatial::matcher::match_stop;

type EntryHandle = Arc<Mutex<BusTrackingEntry>>;

/// Result of [`TrackingRegistry::register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub already_existed: bool,
    /// Route the live entry is bound to, which differs from the requested
    /// route when another registration got there first.
    pub route_id: RouteIdentifier,
}

/// Result of [`TrackingRegistry::update_location`].
#[derive(Clone, Debug, PartialEq)]
pub struct LocationUpdate {
    pub bus_id: BusIdentifier,
    pub location: Point,
    pub status: BusStatus,
    /// Stored progress after the update, not necessarily the matched stop
    pub current_stop_index: Option<usize>,
    pub advanced: bool,
}

impl LocationUpdate {
    pub fn current_stop_index_or_sentinel(&self) -> i64 {
        self.current_stop_index.map_or(-1, |i| i as i64)
    }
}

#[derive(Default)]
pub struct TrackingRegistry {
    entries: RwLock<HashMap<BusIdentifier, EntryHandle>>,
}

impl TrackingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh entry unless the id is already live.
    ///
    /// Registering a live id changes nothing and reports the existing
    /// route binding.
    pub async fn register(&self, registration: BusRegistration) -> RegisterOutcome {
        let mut entries = self.entries.write().await;

        let handle = match entries.entry(registration.bus_id.clone()) {
            Entry::Occupied(slot) => slot.get().clone(),
            Entry::Vacant(slot) => {
                let route_id = registration.route_id.clone();
                tracing::info!(
                    bus_id = %registration.bus_id,
                    route_id = %route_id,
                    stops = registration.stops.len(),
                    "Registered bus"
                );
                slot.insert(Arc::new(Mutex::new(BusTrackingEntry::new(registration))));
                return RegisterOutcome {
                    already_existed: false,
                    route_id,
                };
            }
        };
        // Wait on the entry outside the map lock
        drop(entries);

        let existing = handle.lock().await;
        RegisterOutcome {
            already_existed: true,
            route_id: existing.route_id.clone(),
        }
    }

    /// Record a GPS fix and advance stop progress.
    ///
    /// An unknown bus is reported as [`TrackingError::BusNotRegistered`]
    /// before the coordinates are checked.
    pub async fn update_location(
        &self,
        bus_id: &BusIdentifier,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationUpdate> {
        let handle = self.handle(bus_id).await?;
        validate_coordinates(latitude, longitude)?;
        let position = Point::new(longitude, latitude);

        let mut entry = handle.lock().await;

        let matched = match_stop(position, &entry.stops);
        entry.current_location = Some(position);
        entry.last_update = Some(Utc::now());
        let advanced = entry.advance_to(matched.stop_index);

        tracing::debug!(
            bus_id = %bus_id,
            latitude,
            longitude,
            status = %matched.status,
            current_stop_index = entry.current_stop_index_or_sentinel(),
            "Location update"
        );

        Ok(LocationUpdate {
            bus_id: bus_id.clone(),
            location: position,
            status: matched.status,
            current_stop_index: entry.current_stop_index,
            advanced,
        })
    }

    /// Snapshot of one entry.
    pub async fn get(&self, bus_id: &BusIdentifier) -> Result<BusTrackingEntry> {
        let handle = self.handle(bus_id).await?;
        let entry = handle.lock().await;
        Ok(entry.clone())
    }

    /// Snapshot of every entry, in no particular order.
    pub async fn list(&self) -> Vec<BusTrackingEntry> {
        let handles: Vec<EntryHandle> = self.entries.read().await.values().cloned().collect();

        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            snapshots.push(handle.lock().await.clone());
        }
        snapshots
    }

    pub async fn contains(&self, bus_id: &BusIdentifier) -> bool {
        self.entries.read().await.contains_key(bus_id)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn handle(&self, bus_id: &BusIdentifier) -> Result<EntryHandle> {
        self.entries
            .read()
            .await
            .get(bus_id)
            .cloned()
            .ok_or_else(|| TrackingError::BusNotRegistered(bus_id.clone()))
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(TrackingError::InvalidData(format!(
            "latitude {} is outside [-90, 90]",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(TrackingError::InvalidData(format!(
            "longitude {} is outside [-180, 180]",
            longitude
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stop;
    use std::time::Duration;

    fn bus(id: &str) -> BusIdentifier {
        BusIdentifier::parse(id).unwrap()
    }

    fn registration(id: &str, route: &str) -> BusRegistration {
        BusRegistration {
            bus_id: bus(id),
            route_id: RouteIdentifier::new(route),
            route_name: "Line 1".into(),
            bus_number: id.into(),
            stops: vec![
                Stop::new("Depot", 0.0, 0.0, 1),
                Stop::new("Market", 0.0, 0.001, 2),
            ]
            .into(),
        }
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let registry = TrackingRegistry::new();

        let first = registry.register(registration("AB12", "r1")).await;
        assert!(!first.already_existed);

        registry.update_location(&bus("AB12"), 0.0, 0.0009).await.unwrap();
        let before = registry.get(&bus("AB12")).await.unwrap();

        let mut other = registration("AB12", "r2");
        other.route_name = "Other".into();
        let second = registry.register(other).await;
        assert!(second.already_existed);
        assert_eq!(second.route_id, RouteIdentifier::new("r1"));

        let after = registry.get(&bus("AB12")).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unregistered_bus() {
        let registry = TrackingRegistry::new();

        let err = registry.update_location(&bus("ZZ99"), 0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, TrackingError::BusNotRegistered(_)));
        assert!(registry.get(&bus("ZZ99")).await.is_err());
        assert!(!registry.contains(&bus("ZZ99")).await);
    }

    #[tokio::test]
    async fn test_unregistered_bus_with_bad_coordinates() {
        let registry = TrackingRegistry::new();

        let err = registry.update_location(&bus("ZZ99"), 91.0, 0.0).await.unwrap_err();
        assert!(matches!(err, TrackingError::BusNotRegistered(_)));
    }

    #[tokio::test]
    async fn test_reregister_does_not_block_map_on_busy_entry() {
        let registry = Arc::new(TrackingRegistry::new());
        registry.register(registration("AB12", "r1")).await;

        let handle = registry.handle(&bus("AB12")).await.unwrap();
        let held = handle.lock().await;

        let pending = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.register(registration("AB12", "r2")).await })
        };
        tokio::task::yield_now().await;

        // Map readers proceed while the re-registration waits on the entry
        let lookup = tokio::time::timeout(Duration::from_secs(1), async {
            registry.contains(&bus("CD34")).await
        });
        assert!(!lookup.await.unwrap());
        assert!(!pending.is_finished());

        drop(held);
        let outcome = pending.await.unwrap();
        assert!(outcome.already_existed);
        assert_eq!(outcome.route_id, RouteIdentifier::new("r1"));
    }

    #[tokio::test]
    async fn test_progress_never_regresses() {
        let registry = TrackingRegistry::new();
        registry.register(registration("AB12", "r1")).await;
        let id = bus("AB12");

        let update = registry.update_location(&id, 0.0, 0.0009).await.unwrap();
        assert_eq!(update.status.to_string(), "Arrived at Market");
        assert_eq!(update.current_stop_index, Some(1));
        assert!(update.advanced);

        let update = registry.update_location(&id, 0.0, 0.0).await.unwrap();
        assert_eq!(update.status.to_string(), "Arrived at Depot");
        assert_eq!(update.current_stop_index, Some(1));
        assert!(!update.advanced);

        let entry = registry.get(&id).await.unwrap();
        assert_eq!(entry.current_location, Some(Point::new(0.0, 0.0)));
        assert!(entry.last_update.is_some());
    }

    #[tokio::test]
    async fn test_on_route_keeps_progress_and_refreshes_location() {
        let registry = TrackingRegistry::new();
        registry.register(registration("AB12", "r1")).await;
        let id = bus("AB12");

        let update = registry.update_location(&id, 0.5, 0.5).await.unwrap();
        assert_eq!(update.status, BusStatus::OnRoute);
        assert_eq!(update.current_stop_index_or_sentinel(), -1);

        registry.update_location(&id, 0.0, 0.0).await.unwrap();
        let update = registry.update_location(&id, 0.5, 0.5).await.unwrap();
        assert_eq!(update.current_stop_index, Some(0));

        let entry = registry.get(&id).await.unwrap();
        assert_eq!(entry.current_location, Some(Point::new(0.5, 0.5)));
    }

    #[tokio::test]
    async fn test_rejects_bad_coordinates() {
        let registry = TrackingRegistry::new();
        registry.register(registration("AB12", "r1")).await;
        let id = bus("AB12");

        for (lat, lon) in [(91.0, 0.0), (0.0, -180.5), (f64::NAN, 0.0), (0.0, f64::INFINITY)] {
            let err = registry.update_location(&id, lat, lon).await.unwrap_err();
            assert!(matches!(err, TrackingError::InvalidData(_)));
        }

        let entry = registry.get(&id).await.unwrap();
        assert_eq!(entry.current_location, None);
    }

    #[tokio::test]
    async fn test_list_snapshots_all() {
        let registry = TrackingRegistry::new();
        registry.register(registration("AB12", "r1")).await;
        registry.register(registration("CD34", "r1")).await;

        let mut ids: Vec<String> = registry
            .list()
            .await
            .into_iter()
            .map(|e| e.bus_id.to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["AB12", "CD34"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_stay_monotonic() {
        let registry = Arc::new(TrackingRegistry::new());
        registry.register(registration("AB12", "r1")).await;

        let mut tasks = Vec::new();
        for i in 0..64 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let id = BusIdentifier::parse("AB12").unwrap();
                let lon = if i % 2 == 0 { 0.0 } else { 0.001 };
                let mut seen = Vec::new();
                for _ in 0..10 {
                    let update = registry.update_location(&id, 0.0, lon).await.unwrap();
                    seen.push(update.current_stop_index);
                }
                seen
            }));
        }

        for task in tasks {
            let seen = task.await.unwrap();
            assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        }

        let entry = registry.get(&bus("AB12")).await.unwrap();
        assert_eq!(entry.current_stop_index, Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_single_winner() {
        let registry = Arc::new(TrackingRegistry::new());

        let mut tasks = Vec::new();
        for i in 0..16 {
            let registry = registry.clone();
            let route = format!("r{}", i);
            tasks.push(tokio::spawn(async move {
                registry.register(registration("AB12", &route)).await
            }));
        }

        let mut winners = 0;
        for task in tasks {
            if !task.await.unwrap().already_existed {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(registry.len().await, 1);
    }
}
