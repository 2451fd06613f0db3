//! Consistent hash ring implementation.
//!
//! The ring store keeps virtual-node positions, the distribution pass turns
//! them into a bounded-load partition table, and [`HashRing`] guards both
//! behind a reader/writer lock.

pub mod builder;
pub mod distribution;
pub mod ring;
pub mod snapshot;
pub mod store;

pub use builder::RingBuilder;
pub use distribution::{avg_load, Assignment, LOAD_FACTOR};
pub use ring::HashRing;
pub use snapshot::RingSnapshot;
pub use store::RingStore;
