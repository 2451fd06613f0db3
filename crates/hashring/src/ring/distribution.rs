//! Bounded-load partition distribution.
//!
//! After every topology change the whole partition space is assigned again
//! from scratch:
//!
//! 1. `avg_load = ceil(partition_count / bucket_count * 1.25)` is the soft cap
//!    every bucket must stay under for this pass.
//! 2. Partition `p` is seeded at `hash(p as u64 little-endian)` on the ring.
//! 3. Starting at the nearest successor of the seed, the ring is walked
//!    clockwise (wrapping, each position at most once) until a bucket with
//!    room under the cap is found.
//! 4. If the walk comes back to its start, the pass fails with
//!    [`Error::CapacityExhausted`] and nothing is returned to commit.
//!
//! The 1.25 slack is the "consistent hashing with bounded loads" trade-off:
//! loose enough that most partitions land on their natural owner, tight
//! enough that no bucket becomes a hotspot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use super::store::RingStore;
use crate::config::HashFn;
use crate::error::{Error, Result};
use crate::metrics;

/// Slack factor over the perfectly even share.
pub const LOAD_FACTOR: f64 = 1.25;

/// Soft per-bucket cap on owned partitions. Zero without buckets.
pub fn avg_load(partition_count: usize, bucket_count: usize) -> usize {
    if bucket_count == 0 {
        return 0;
    }
    (partition_count as f64 / bucket_count as f64 * LOAD_FACTOR).ceil() as usize
}

/// Ring position a partition is seeded at.
pub fn partition_seed(hasher: HashFn, partition: usize) -> u64 {
    hasher(&(partition as u64).to_le_bytes())
}

/// The result of one distribution pass: partition and load tables together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Owner of each partition id; empty when there are no buckets.
    partitions: Vec<Arc<str>>,
    /// Partitions owned per live bucket, zero entries included.
    loads: HashMap<Arc<str>, usize>,
    avg_load: usize,
}

impl Assignment {
    /// The assignment of a ring without buckets.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn owner(&self, partition: usize) -> Option<&Arc<str>> {
        self.partitions.get(partition)
    }

    pub fn partitions(&self) -> &[Arc<str>] {
        &self.partitions
    }

    pub fn loads(&self) -> &HashMap<Arc<str>, usize> {
        &self.loads
    }

    pub fn avg_load(&self) -> usize {
        self.avg_load
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

/// Assign every partition in `0..partition_count` to one of `buckets`.
///
/// `buckets` must be exactly the live bucket keys whose virtual nodes are in
/// `store`. Deterministic for a given store, hasher and bucket set.
pub fn distribute(
    store: &RingStore,
    hasher: HashFn,
    partition_count: usize,
    buckets: &[Arc<str>],
) -> Result<Assignment> {
    let bucket_count = buckets.len();
    if bucket_count == 0 {
        return Ok(Assignment::empty());
    }

    let started = Instant::now();
    let cap = avg_load(partition_count, bucket_count);
    let mut loads: HashMap<Arc<str>, usize> =
        buckets.iter().map(|b| (Arc::clone(b), 0)).collect();
    let mut partitions = Vec::with_capacity(partition_count);

    for partition in 0..partition_count {
        let exhausted = || {
            warn!(
                partition,
                avg_load = cap,
                buckets = bucket_count,
                "could not distribute partitions"
            );
            metrics::record_capacity_exhausted();
            Error::CapacityExhausted {
                partition,
                avg_load: cap,
                buckets: bucket_count,
            }
        };

        let start = store
            .nearest_successor(partition_seed(hasher, partition))
            .ok_or_else(exhausted)?;

        let owner = store
            .walk_from(start)
            .find_map(|vnode| match loads.get_mut(&vnode.bucket) {
                Some(load) if *load < cap => {
                    *load += 1;
                    Some(Arc::clone(&vnode.bucket))
                }
                _ => None,
            })
            .ok_or_else(exhausted)?;

        partitions.push(owner);
    }

    let elapsed = started.elapsed();
    metrics::record_redistribution(elapsed, bucket_count);
    debug!(
        partitions = partition_count,
        buckets = bucket_count,
        vnodes = store.len(),
        avg_load = cap,
        elapsed_us = elapsed.as_micros() as u64,
        "distributed partitions"
    );

    Ok(Assignment {
        partitions,
        loads,
        avg_load: cap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::fnv1_64;

    fn store_with(buckets: &[&str], rf: usize) -> (RingStore, Vec<Arc<str>>) {
        let mut store = RingStore::new(fnv1_64, rf);
        let keys: Vec<Arc<str>> = buckets.iter().map(|b| Arc::from(*b)).collect();
        for key in &keys {
            store.insert_positions(key);
        }
        (store, keys)
    }

    #[test]
    fn test_avg_load() {
        assert_eq!(avg_load(23, 0), 0);
        assert_eq!(avg_load(23, 1), 29); // ceil(28.75)
        assert_eq!(avg_load(23, 8), 4); // ceil(3.59375)
        assert_eq!(avg_load(71, 7), 13); // ceil(12.678...)
        assert_eq!(avg_load(8, 8), 2); // ceil(1.25)
        assert_eq!(avg_load(3, 8), 1); // fewer partitions than buckets
    }

    #[test]
    fn test_partition_seed_is_little_endian_u64() {
        assert_eq!(partition_seed(fnv1_64, 1), fnv1_64(&[1, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_no_buckets_gives_empty_assignment() {
        let store = RingStore::new(fnv1_64, 20);
        let assignment = distribute(&store, fnv1_64, 23, &[]).unwrap();
        assert!(assignment.is_empty());
        assert!(assignment.loads().is_empty());
        assert_eq!(assignment.avg_load(), 0);
    }

    #[test]
    fn test_single_bucket_owns_everything() {
        let (store, keys) = store_with(&["A"], 20);
        let assignment = distribute(&store, fnv1_64, 23, &keys).unwrap();
        assert_eq!(assignment.partitions().len(), 23);
        assert!(assignment.partitions().iter().all(|p| &**p == "A"));
        assert_eq!(assignment.loads().get("A"), Some(&23));
    }

    #[test]
    fn test_loads_cover_and_respect_cap() {
        let names: Vec<String> = (0..8).map(|i| format!("node{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (store, keys) = store_with(&refs, 20);

        let assignment = distribute(&store, fnv1_64, 23, &keys).unwrap();
        let total: usize = assignment.loads().values().sum();
        assert_eq!(total, 23);
        assert_eq!(assignment.loads().len(), 8);
        for load in assignment.loads().values() {
            assert!(*load <= assignment.avg_load());
        }
        for (partition, owner) in assignment.partitions().iter().enumerate() {
            assert!(keys.contains(owner), "partition {partition} owned by unknown {owner}");
        }
    }

    #[test]
    fn test_pass_is_deterministic() {
        let (store, keys) = store_with(&["a", "b", "c", "d"], 10);
        let first = distribute(&store, fnv1_64, 71, &keys).unwrap();
        let second = distribute(&store, fnv1_64, 71, &keys).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bucket_without_positions_exhausts() {
        // "b" is live but has no virtual nodes, so only "a" can take
        // partitions, and "a" alone cannot exceed the two-bucket cap.
        let (store, _) = store_with(&["a"], 4);
        let keys: Vec<Arc<str>> = vec![Arc::from("a"), Arc::from("b")];
        let err = distribute(&store, fnv1_64, 10, &keys).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityExhausted {
                partition: 7,
                avg_load: 7,
                buckets: 2
            }
        );
    }
}
