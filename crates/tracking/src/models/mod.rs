//! Tracking data models, types, and errors.

pub mod entry;
pub mod route;
pub mod types;

// Re-exports for convenience
pub use entry::{BusRegistration, BusTrackingEntry};
pub use route::{BusBinding, Route, Stop};
pub use types::{BusStatus, ErrorKind, Result, TrackingError};
