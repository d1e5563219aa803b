//! Geospatial distance and stop matching.

pub mod matcher;
pub mod queries;

pub use matcher::{match_stop, StopMatch, ARRIVAL_THRESHOLD_M};
pub use queries::{haversine_distance, EARTH_RADIUS_M};
