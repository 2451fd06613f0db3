//! Ring store: the sorted set of virtual-node positions.
//!
//! Positions live in a single `Vec<VirtualNode>` kept sorted by position and
//! free of duplicates. Insertion, removal and successor lookup are binary
//! searches; the walk used by the distribution pass is a plain index walk
//! with wraparound.
//!
//! # Collisions
//!
//! When a new virtual node lands on a position that is already taken by a
//! different bucket, the newer bucket takes the position over (last insert
//! wins). Removal only deletes positions the removed bucket currently owns,
//! so removing the overwritten bucket later never evicts the winner. The
//! overwritten bucket does not get the position back when the winner leaves.
//!
//! With ordinary names this happens more than hash luck suggests: replica
//! `1x` of `node1` and replica `x` of `node11` hash the same bytes. Adding
//! `node11` after `node1` takes ten of `node1`'s twenty positions at the
//! default replication factor, and removing `node11` again leaves `node1`
//! with only ten.
//!
//! # Performance
//!
//! - Lookup of the nearest successor: O(log V)
//! - Insert/remove of a bucket: O(R * V) for the element shifts, with V
//!   positions on the ring and R replicas per bucket
//! - Cloning the store for a staged mutation: O(V), reference counted keys

use std::sync::Arc;

use tracing::warn;

use crate::config::HashFn;
use crate::metrics;
use crate::vnode::{vnode_positions, VirtualNode};

#[derive(Clone)]
pub struct RingStore {
    hasher: HashFn,
    replication_factor: usize,
    /// Sorted by position, unique positions.
    vnodes: Vec<VirtualNode>,
}

impl RingStore {
    pub fn new(hasher: HashFn, replication_factor: usize) -> Self {
        Self {
            hasher,
            replication_factor,
            vnodes: Vec::new(),
        }
    }

    /// Place every virtual node of `bucket` on the ring.
    ///
    /// Returns how many positions were taken over from other buckets.
    pub fn insert_positions(&mut self, bucket: &Arc<str>) -> usize {
        let mut overwritten = 0;

        for position in vnode_positions(self.hasher, bucket, self.replication_factor) {
            match self.search(position) {
                Ok(idx) => {
                    let slot = &mut self.vnodes[idx];
                    if slot.bucket != *bucket {
                        warn!(
                            position,
                            previous = %slot.bucket,
                            bucket = %bucket,
                            "virtual node collision, position reassigned"
                        );
                        metrics::record_vnode_collision();
                        slot.bucket = Arc::clone(bucket);
                        overwritten += 1;
                    }
                }
                Err(idx) => {
                    self.vnodes
                        .insert(idx, VirtualNode::new(position, Arc::clone(bucket)));
                }
            }
        }

        overwritten
    }

    /// Remove every virtual node `key` still owns. Returns how many went.
    pub fn remove_positions(&mut self, key: &str) -> usize {
        let mut removed = 0;

        for position in vnode_positions(self.hasher, key, self.replication_factor) {
            if let Ok(idx) = self.search(position) {
                if &*self.vnodes[idx].bucket == key {
                    self.vnodes.remove(idx);
                    removed += 1;
                }
            }
        }

        removed
    }

    /// Index of the first position `>= hash`, wrapping to 0 past the end.
    ///
    /// `None` only when the ring is empty.
    pub fn nearest_successor(&self, hash: u64) -> Option<usize> {
        if self.vnodes.is_empty() {
            return None;
        }
        let idx = self.vnodes.partition_point(|v| v.position < hash);
        Some(if idx == self.vnodes.len() { 0 } else { idx })
    }

    /// Every virtual node once, clockwise starting at `start`.
    pub fn walk_from(&self, start: usize) -> impl Iterator<Item = &VirtualNode> + '_ {
        let (tail, head) = self.vnodes.split_at(start.min(self.vnodes.len()));
        head.iter().chain(tail.iter())
    }

    /// Number of distinct positions on the ring.
    pub fn len(&self) -> usize {
        self.vnodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    pub fn vnodes(&self) -> &[VirtualNode] {
        &self.vnodes
    }

    fn search(&self, position: u64) -> Result<usize, usize> {
        self.vnodes.binary_search_by_key(&position, |v| v.position)
    }
}
