//! Fluent construction of a [`HashRing`].

use super::ring::HashRing;
use crate::bucket::Bucket;
use crate::config::{Config, HashFn};
use crate::error::Result;

/// Builder for [`HashRing`].
///
/// ```rust
/// use hashring::{hash, RingBuilder};
///
/// let ring = RingBuilder::new()
///     .hasher(hash::xxh3)
///     .partition_count(271)
///     .bucket("cache-a")
///     .bucket("cache-b")
///     .build()
///     .unwrap();
///
/// assert_eq!(ring.bucket_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<B: Bucket> {
    config: Config,
    buckets: Vec<B>,
}

impl<B: Bucket> RingBuilder<B> {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            buckets: Vec::new(),
        }
    }

    /// Start from an existing configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            buckets: Vec::new(),
        }
    }

    pub fn hasher(mut self, hasher: HashFn) -> Self {
        self.config.hasher = Some(hasher);
        self
    }

    /// Zero keeps the default.
    pub fn partition_count(mut self, partition_count: usize) -> Self {
        self.config.partition_count = partition_count;
        self
    }

    /// Zero keeps the default.
    pub fn replication_factor(mut self, replication_factor: usize) -> Self {
        self.config.replication_factor = replication_factor;
        self
    }

    pub fn bucket(mut self, bucket: B) -> Self {
        self.buckets.push(bucket);
        self
    }

    pub fn buckets(mut self, buckets: impl IntoIterator<Item = B>) -> Self {
        self.buckets.extend(buckets);
        self
    }

    /// Build the ring, running the first distribution pass.
    pub fn build(self) -> Result<HashRing<B>> {
        HashRing::new(self.config, self.buckets)
    }
}

impl<B: Bucket> Default for RingBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}
