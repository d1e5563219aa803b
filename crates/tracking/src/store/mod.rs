//! Durable store interface and the in-memory implementation.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{StoreFuture, TrackingStore};
