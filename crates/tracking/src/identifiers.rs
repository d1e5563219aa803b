//! Type-safe identifiers for tracked buses and their routes.
//!
//! All identifiers use Arc<str> for cheap cloning; the live registry hands
//! out snapshots that share them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::models::types::{Result, TrackingError};

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_identifier!(BusIdentifier);
impl_identifier!(RouteIdentifier);

/// Symbols a bus id is drawn from.
pub const BUS_ID_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every bus id.
pub const BUS_ID_LEN: usize = 4;

impl BusIdentifier {
    /// Parse a user-supplied bus id.
    ///
    /// Surrounding whitespace is dropped and lowercase letters are folded to
    /// uppercase, so `" ab12"` and `"AB12"` name the same bus.
    pub fn parse(s: impl AsRef<str>) -> Result<Self> {
        let normalized = s.as_ref().trim().to_ascii_uppercase();
        let valid = normalized.len() == BUS_ID_LEN
            && normalized.bytes().all(|b| BUS_ID_ALPHABET.contains(&b));

        if !valid {
            return Err(TrackingError::InvalidBusId(s.as_ref().to_string()));
        }

        Ok(Self(normalized.into()))
    }

    /// Build an id from symbols already known to be in [`BUS_ID_ALPHABET`].
    pub(crate) fn from_symbols(symbols: [u8; BUS_ID_LEN]) -> Self {
        Self(symbols.iter().map(|&b| b as char).collect::<String>().into())
    }
}

impl RouteIdentifier {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }
}

impl From<String> for RouteIdentifier {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for RouteIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
