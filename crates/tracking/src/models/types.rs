//! Core enums and errors for live tracking.

use std::fmt;
use std::sync::Arc;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Arrival status reported for a single location update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusStatus {
    /// Not within the arrival threshold of any stop.
    OnRoute,
    /// Within the arrival threshold of the named stop.
    ArrivedAt(Arc<str>),
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnRoute => write!(f, "On Route"),
            Self::ArrivedAt(name) => write!(f, "Arrived at {}", name),
        }
    }
}

/// Coarse error classes, one per failure response the transport produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Exhausted,
    Internal,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Invalid bus id: {0:?} (expected 4 characters A-Z or 0-9)")]
    InvalidBusId(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Route not found: {0}")]
    RouteNotFound(RouteIdentifier),

    #[error("Bus not registered: {0}")]
    BusNotRegistered(BusIdentifier),

    #[error("Bus not found: {0}")]
    BusNotFound(BusIdentifier),

    #[error("Bus {bus_id} is already bound to route {bound_to}, not {requested}")]
    Conflict {
        bus_id: BusIdentifier,
        bound_to: RouteIdentifier,
        requested: RouteIdentifier,
    },

    #[error("Unable to generate unique id after {attempts} attempts")]
    IdSpaceExhausted { attempts: usize },

    #[error("Store error: {0}")]
    Store(String),
}

impl TrackingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBusId(_) | Self::InvalidData(_) => ErrorKind::Validation,
            Self::RouteNotFound(_) | Self::BusNotRegistered(_) | Self::BusNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::IdSpaceExhausted { .. } => ErrorKind::Exhausted,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(BusStatus::OnRoute.to_string(), "On Route");
        assert_eq!(
            BusStatus::ArrivedAt("Market".into()).to_string(),
            "Arrived at Market"
        );
    }

    #[test]
    fn test_error_kinds() {
        let bus = BusIdentifier::parse("AB12").unwrap();
        let route = RouteIdentifier::new("r1");

        assert_eq!(
            TrackingError::InvalidBusId("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            TrackingError::BusNotRegistered(bus.clone()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            TrackingError::RouteNotFound(route.clone()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            TrackingError::Conflict {
                bus_id: bus,
                bound_to: route.clone(),
                requested: route,
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            TrackingError::IdSpaceExhausted { attempts: 1 }.kind(),
            ErrorKind::Exhausted
        );
        assert_eq!(TrackingError::Store("down".into()).kind(), ErrorKind::Internal);
    }
}
