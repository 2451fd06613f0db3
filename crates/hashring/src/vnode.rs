//! Virtual nodes.
//!
//! Each bucket is represented on the ring by `replication_factor` virtual
//! nodes instead of a single position. More positions per bucket smooth out
//! the share of the ring each bucket covers, which in turn lets the bounded
//! load pass find room for every partition close to its natural owner.
//!
//! # Position derivation
//!
//! The position of replica `i` of bucket `key` is `hash(key ++ decimal(i))`,
//! e.g. `hash("node3" ++ "17") = hash("node317")`. It is a pure function of
//! `(key, i)`, so removal recomputes the positions instead of remembering
//! them.
//!
//! Note the concatenation has no separator: `("node1", 11)` and
//! `("node11", 1)` hash the same bytes, so at the default replication
//! factor `node1` and `node11` share ten positions. Such collisions are
//! resolved by the ring store like any other.

use std::fmt;
use std::sync::Arc;

use crate::config::HashFn;

/// A virtual node: one position on the ring and the bucket that owns it.
///
/// # Invariants
///
/// - Within a ring store no two `VirtualNode`s share a position
/// - Ordered by position first, so a sorted `Vec<VirtualNode>` is the ring
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Position on the 64-bit ring.
    pub position: u64,
    /// Key of the owning bucket.
    pub bucket: Arc<str>,
}

impl VirtualNode {
    #[inline]
    pub fn new(position: u64, bucket: Arc<str>) -> Self {
        Self { position, bucket }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(position={:016x}, bucket={})", self.position, self.bucket)
    }
}

/// Ring position of replica `replica` of the bucket keyed `key`.
///
/// # Arguments
///
/// * `hasher` - The ring's hash function
/// * `key` - Bucket key, see [`Bucket::key`](crate::Bucket::key)
/// * `replica` - Replica index in `0..replication_factor`
///
/// # Performance
///
/// Allocates one short string per call. Positions are only derived on
/// add and remove, never on the lookup path.
pub fn vnode_position(hasher: HashFn, key: &str, replica: usize) -> u64 {
    let vnode_key = format!("{key}{replica}");
    hasher(vnode_key.as_bytes())
}

/// All `replication_factor` positions of a bucket, in replica order.
pub fn vnode_positions(
    hasher: HashFn,
    key: &str,
    replication_factor: usize,
) -> impl Iterator<Item = u64> + '_ {
    (0..replication_factor).map(move |replica| vnode_position(hasher, key, replica))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::fnv1_64;

    #[test]
    fn test_position_hashes_concatenated_key() {
        assert_eq!(vnode_position(fnv1_64, "node3", 17), fnv1_64(b"node317"));
        assert_eq!(vnode_position(fnv1_64, "a", 0), fnv1_64(b"a0"));
    }

    #[test]
    fn test_replicas_get_distinct_positions() {
        let positions: Vec<u64> = vnode_positions(fnv1_64, "node1", 2).collect();
        assert_ne!(positions[0], positions[1]);
    }

    #[test]
    fn test_unseparated_keys_share_positions() {
        // "node1" ++ "10" and "node11" ++ "0" are the same bytes.
        assert_eq!(
            vnode_position(fnv1_64, "node1", 10),
            vnode_position(fnv1_64, "node11", 0)
        );
    }

    #[test]
    fn test_positions_are_reproducible() {
        let first: Vec<u64> = vnode_positions(fnv1_64, "node7", 20).collect();
        let second: Vec<u64> = vnode_positions(fnv1_64, "node7", 20).collect();
        assert_eq!(first.len(), 20);
        assert_eq!(first, second);
    }

    #[test]
    fn test_vnode_ordering() {
        let a = VirtualNode::new(100, Arc::from("z"));
        let b = VirtualNode::new(200, Arc::from("a"));
        assert!(a < b); // ordered by position
    }
}
