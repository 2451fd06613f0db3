//! Ring configuration.
//!
//! A [`Config`] carries the injected hash function and the two sizing knobs of
//! the ring. Zero counts fall back to the defaults below; a missing hasher is
//! the only hard error and is reported when the ring is built.

use std::fmt;

use crate::error::{Error, Result};

/// Partition count used when the configuration leaves it at zero.
///
/// Prime, like any partition count should be for a uniform spread.
pub const DEFAULT_PARTITION_COUNT: usize = 71;

/// Virtual nodes per bucket used when the configuration leaves it at zero.
pub const DEFAULT_REPLICATION_FACTOR: usize = 20;

/// Pure, deterministic hash from a byte sequence to a 64-bit integer.
///
/// Need not be collision-free. See [`crate::hash`] for ready-made ones.
pub type HashFn = fn(&[u8]) -> u64;

/// Configuration for a [`HashRing`](crate::HashRing).
#[derive(Clone, Copy, Default)]
pub struct Config {
    /// Hash function used for ring positions, partition seeds and keys.
    pub hasher: Option<HashFn>,
    /// Number of partitions the key space is split into. Fixed for the
    /// lifetime of the ring.
    pub partition_count: usize,
    /// Number of virtual nodes placed on the ring per bucket.
    pub replication_factor: usize,
}

impl Config {
    /// Config with the given hasher and default counts.
    pub fn new(hasher: HashFn) -> Self {
        Self {
            hasher: Some(hasher),
            ..Self::default()
        }
    }

    pub fn with_partition_count(mut self, partition_count: usize) -> Self {
        self.partition_count = partition_count;
        self
    }

    pub fn with_replication_factor(mut self, replication_factor: usize) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    /// Fill in defaults and reject a missing hasher.
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let hasher = self
            .hasher
            .ok_or_else(|| Error::InvalidConfiguration("hasher can not be missing".into()))?;

        Ok(ValidatedConfig {
            hasher,
            partition_count: non_zero_or(self.partition_count, DEFAULT_PARTITION_COUNT),
            replication_factor: non_zero_or(self.replication_factor, DEFAULT_REPLICATION_FACTOR),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hasher", &self.hasher.map(|_| "fn(&[u8]) -> u64"))
            .field("partition_count", &self.partition_count)
            .field("replication_factor", &self.replication_factor)
            .finish()
    }
}

/// A [`Config`] with every field resolved.
#[derive(Clone, Copy)]
pub struct ValidatedConfig {
    pub hasher: HashFn,
    pub partition_count: usize,
    pub replication_factor: usize,
}

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedConfig")
            .field("partition_count", &self.partition_count)
            .field("replication_factor", &self.replication_factor)
            .finish_non_exhaustive()
    }
}

fn non_zero_or(value: usize, default: usize) -> usize {
    if value == 0 {
        default
    } else {
        value
    }
}
