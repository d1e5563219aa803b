//! Short bus id allocation.
//!
//! Candidates are drawn uniformly from the 36^4 id space and rejected when
//! either the live registry or the durable store already knows them. There
//! is no reservation: two concurrent allocations can hand out the same id,
//! and the later registration then reports a conflict.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use crate::identifiers::*;
use crate::models::{Result, TrackingError};
use crate::registry::TrackingRegistry;
use crate::store::TrackingStore;

/// Default number of candidates tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

pub struct IdAllocator {
    rng: Mutex<StdRng>,
    max_attempts: usize,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Allocator drawing from a caller-supplied generator (seeded in tests)
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Find an id unknown to both `registry` and `store`.
    pub async fn allocate(
        &self,
        registry: &TrackingRegistry,
        store: &dyn TrackingStore,
    ) -> Result<BusIdentifier> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.candidate().await;

            if registry.contains(&candidate).await {
                continue;
            }
            if store.bus_id_exists(&candidate).await? {
                continue;
            }

            tracing::debug!(bus_id = %candidate, attempt, "Allocated bus id");
            return Ok(candidate);
        }

        tracing::error!(attempts = self.max_attempts, "Bus id space exhausted");
        Err(TrackingError::IdSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    async fn candidate(&self) -> BusIdentifier {
        let mut rng = self.rng.lock().await;
        let mut symbols = [0u8; BUS_ID_LEN];
        for symbol in &mut symbols {
            *symbol = BUS_ID_ALPHABET[rng.random_range(0..BUS_ID_ALPHABET.len())];
        }
        BusIdentifier::from_symbols(symbols)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
