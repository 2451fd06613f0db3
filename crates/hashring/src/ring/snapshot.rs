//! Serializable point-in-time view of a ring.

use std::collections::BTreeMap;

use serde::Serialize;

/// Everything a [`HashRing`](crate::HashRing) knows, copied out under a
/// single read lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RingSnapshot {
    pub partition_count: usize,
    pub replication_factor: usize,
    /// Distinct virtual-node positions on the ring.
    pub vnode_count: usize,
    /// Per-bucket cap in force.
    pub avg_load: usize,
    /// Bucket keys, sorted.
    pub buckets: Vec<String>,
    /// Partitions owned per bucket key.
    pub loads: BTreeMap<String, usize>,
    /// Owner key per partition id.
    pub partitions: Vec<Option<String>>,
}

impl RingSnapshot {
    /// Partition ids owned by `bucket`, ascending.
    pub fn partitions_of(&self, bucket: &str) -> Vec<usize> {
        self.partitions
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.as_deref() == Some(bucket))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(partitions: &[Option<&str>]) -> RingSnapshot {
        RingSnapshot {
            partition_count: partitions.len(),
            replication_factor: 1,
            vnode_count: 0,
            avg_load: 0,
            buckets: Vec::new(),
            loads: BTreeMap::new(),
            partitions: partitions.iter().map(|p| p.map(String::from)).collect(),
        }
    }

    #[test]
    fn test_partitions_of() {
        let snap = snapshot(&[Some("a"), Some("b"), Some("a"), None]);
        assert_eq!(snap.partitions_of("a"), vec![0, 2]);
        assert_eq!(snap.partitions_of("b"), vec![1]);
        assert!(snap.partitions_of("c").is_empty());
    }

    #[test]
    fn test_serializes_as_json() {
        let snap = snapshot(&[Some("a"), None]);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["partition_count"], 2);
        assert_eq!(json["partitions"][0], "a");
        assert!(json["partitions"][1].is_null());
    }
}
