//! The concurrency-safe hash ring.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::distribution::{self, Assignment};
use super::snapshot::RingSnapshot;
use super::store::RingStore;
use crate::bucket::Bucket;
use crate::config::{Config, HashFn};
use crate::error::Result;
use crate::metrics;

/// Consistent hash ring with bounded-load partition assignment.
///
/// Keys hash into one of a fixed number of partitions; partitions are spread
/// over the buckets by walking a virtual-node ring, with no bucket allowed
/// more than [`avg_load`](HashRing::avg_load) partitions.
///
/// # Concurrency
///
/// All methods take `&self`. [`add`](HashRing::add) and
/// [`remove`](HashRing::remove) hold the write lock for the whole
/// redistribution pass; queries share the read lock. A reader sees the ring
/// either before or after a mutation, never in between.
///
/// # Example
///
/// ```rust
/// use hashring::{hash, Config, HashRing};
///
/// let config = Config::new(hash::fnv1_64)
///     .with_partition_count(23)
///     .with_replication_factor(20);
/// let buckets: Vec<String> = (0..8).map(|i| format!("node{i}")).collect();
/// let ring = HashRing::new(config, buckets).unwrap();
///
/// assert_eq!(ring.get("test-key").as_deref(), Some("node7"));
/// ```
pub struct HashRing<B: Bucket> {
    hasher: HashFn,
    partition_count: usize,
    replication_factor: usize,
    state: RwLock<RingState<B>>,
}

/// Everything a mutation replaces, behind one lock.
struct RingState<B> {
    store: RingStore,
    buckets: HashMap<Arc<str>, B>,
    assignment: Assignment,
}

impl<B: Bucket> HashRing<B> {
    /// Build a ring from `config` and an initial, possibly empty, bucket set.
    ///
    /// Buckets with a key seen earlier in `buckets` are skipped. The
    /// distribution pass runs once, after all buckets are placed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// without a hasher, [`Error::CapacityExhausted`](crate::Error::CapacityExhausted)
    /// if the initial buckets cannot take every partition.
    pub fn new(config: Config, buckets: impl IntoIterator<Item = B>) -> Result<Self> {
        let config = config.validate()?;

        let mut store = RingStore::new(config.hasher, config.replication_factor);
        let mut known: HashMap<Arc<str>, B> = HashMap::new();
        for bucket in buckets {
            let key: Arc<str> = Arc::from(bucket.key());
            if known.contains_key(&key) {
                continue;
            }
            store.insert_positions(&key);
            known.insert(key, bucket);
        }

        let keys: Vec<Arc<str>> = known.keys().cloned().collect();
        let assignment =
            distribution::distribute(&store, config.hasher, config.partition_count, &keys)?;
        metrics::record_bucket_count(known.len());

        debug!(
            buckets = known.len(),
            partitions = config.partition_count,
            replication_factor = config.replication_factor,
            "created hash ring"
        );

        Ok(Self {
            hasher: config.hasher,
            partition_count: config.partition_count,
            replication_factor: config.replication_factor,
            state: RwLock::new(RingState {
                store,
                buckets: known,
                assignment,
            }),
        })
    }

    /// Add a bucket and redistribute.
    ///
    /// Returns `Ok(false)` without touching anything if a bucket with the
    /// same key is already present.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExhausted`](crate::Error::CapacityExhausted) if the
    /// new topology cannot take every partition; the ring keeps its previous
    /// buckets and tables.
    pub fn add(&self, bucket: B) -> Result<bool> {
        let mut state = self.state.write();

        if state.buckets.contains_key(bucket.key()) {
            debug!(bucket = bucket.key(), "bucket already in ring");
            return Ok(false);
        }

        let key: Arc<str> = Arc::from(bucket.key());
        let mut store = state.store.clone();
        store.insert_positions(&key);

        let mut keys: Vec<Arc<str>> = state.buckets.keys().cloned().collect();
        keys.push(Arc::clone(&key));
        let assignment =
            distribution::distribute(&store, self.hasher, self.partition_count, &keys)?;

        state.store = store;
        state.buckets.insert(Arc::clone(&key), bucket);
        state.assignment = assignment;
        metrics::record_bucket_count(state.buckets.len());

        debug!(bucket = %key, buckets = state.buckets.len(), "added bucket to ring");
        Ok(true)
    }

    /// Remove the bucket keyed `key` and redistribute.
    ///
    /// Returns `Ok(false)` if no such bucket exists. Removing the last bucket
    /// clears both tables without a distribution pass.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExhausted`](crate::Error::CapacityExhausted) if the
    /// remaining buckets cannot take every partition; the bucket then stays.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut state = self.state.write();

        if !state.buckets.contains_key(key) {
            debug!(bucket = key, "bucket not in ring");
            return Ok(false);
        }

        let mut store = state.store.clone();
        store.remove_positions(key);

        let keys: Vec<Arc<str>> = state
            .buckets
            .keys()
            .filter(|k| &***k != key)
            .cloned()
            .collect();
        let assignment = if keys.is_empty() {
            Assignment::empty()
        } else {
            distribution::distribute(&store, self.hasher, self.partition_count, &keys)?
        };

        state.store = store;
        state.buckets.remove(key);
        state.assignment = assignment;
        metrics::record_bucket_count(state.buckets.len());

        debug!(bucket = key, buckets = state.buckets.len(), "removed bucket from ring");
        Ok(true)
    }

    /// Partition a key falls into: `hash(key) % partition_count`.
    pub fn partition_id(&self, key: impl AsRef<[u8]>) -> usize {
        ((self.hasher)(key.as_ref()) % self.partition_count as u64) as usize
    }

    /// Bucket owning partition `id`, `None` if unassigned (no buckets) or
    /// out of range.
    pub fn partition_bucket(&self, id: usize) -> Option<B> {
        let state = self.state.read();
        state.partition_bucket(id)
    }

    /// Route a key to its bucket.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<B> {
        let id = self.partition_id(key);
        let state = self.state.read();
        state.partition_bucket(id)
    }

    /// All buckets currently in the ring, in no particular order.
    pub fn buckets(&self) -> Vec<B> {
        self.state.read().buckets.values().cloned().collect()
    }

    /// Copy of the load table: partitions owned per bucket key.
    ///
    /// Every live bucket has an entry, zero if it owns nothing. Empty when the
    /// ring has no buckets.
    pub fn loads(&self) -> HashMap<String, usize> {
        self.state
            .read()
            .assignment
            .loads()
            .iter()
            .map(|(key, load)| (key.to_string(), *load))
            .collect()
    }

    /// Current per-bucket cap, `ceil(partition_count / buckets * 1.25)`; zero
    /// without buckets.
    pub fn avg_load(&self) -> usize {
        self.state.read().assignment.avg_load()
    }

    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    pub fn bucket_count(&self) -> usize {
        self.state.read().buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().buckets.is_empty()
    }

    /// Whether a bucket keyed `key` is in the ring.
    pub fn contains(&self, key: &str) -> bool {
        self.state.read().buckets.contains_key(key)
    }

    /// Number of distinct virtual-node positions on the ring.
    pub fn vnode_count(&self) -> usize {
        self.state.read().store.len()
    }

    /// Owner key of every partition id, `None` throughout without buckets.
    pub fn partitions(&self) -> Vec<Option<String>> {
        let state = self.state.read();
        state.partition_owners(self.partition_count)
    }

    /// Consistent point-in-time view of the whole ring.
    pub fn snapshot(&self) -> RingSnapshot {
        let state = self.state.read();

        let mut buckets: Vec<String> = state.buckets.keys().map(|k| k.to_string()).collect();
        buckets.sort();

        let loads: BTreeMap<String, usize> = state
            .assignment
            .loads()
            .iter()
            .map(|(key, load)| (key.to_string(), *load))
            .collect();

        RingSnapshot {
            partition_count: self.partition_count,
            replication_factor: self.replication_factor,
            vnode_count: state.store.len(),
            avg_load: state.assignment.avg_load(),
            buckets,
            loads,
            partitions: state.partition_owners(self.partition_count),
        }
    }
}

impl<B: Bucket> RingState<B> {
    fn partition_bucket(&self, id: usize) -> Option<B> {
        let owner = self.assignment.owner(id)?;
        self.buckets.get(owner).cloned()
    }

    fn partition_owners(&self, partition_count: usize) -> Vec<Option<String>> {
        (0..partition_count)
            .map(|id| self.assignment.owner(id).map(|key| key.to_string()))
            .collect()
    }
}

impl<B: Bucket> fmt::Debug for HashRing<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("HashRing")
            .field("partition_count", &snapshot.partition_count)
            .field("replication_factor", &snapshot.replication_factor)
            .field("vnode_count", &snapshot.vnode_count)
            .field("avg_load", &snapshot.avg_load)
            .field("loads", &snapshot.loads)
            .finish()
    }
}
