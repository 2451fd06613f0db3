//! Consistent hashing with bounded loads.
//!
//! This crate routes opaque keys onto a dynamic set of buckets:
//! - Keys hash into a fixed number of partitions
//! - Partitions are assigned to buckets by walking a virtual-node ring
//! - No bucket owns more than `ceil(partitions / buckets * 1.25)` partitions
//! - Add/remove recompute the assignment under an exclusive lock; lookups share
//!   a read lock
//!
//! Hashing is injected ([`HashFn`], see [`hash`] for built-ins) and buckets are
//! anything implementing [`Bucket`].

pub mod bucket;
pub mod config;
pub mod error;
pub mod hash;
pub mod metrics;
pub mod ring;
pub mod vnode;

pub use bucket::Bucket;
pub use config::{Config, HashFn, DEFAULT_PARTITION_COUNT, DEFAULT_REPLICATION_FACTOR};
pub use error::{Error, Result};
pub use hash::BuiltinHasher;
pub use ring::{HashRing, RingBuilder, RingSnapshot};
pub use vnode::VirtualNode;
