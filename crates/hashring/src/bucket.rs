//! Bucket abstraction.
//!
//! A bucket is a caller-owned destination (a server, a shard, a queue) that
//! the ring routes keys to. The ring only needs a stable string identity from
//! it: two buckets are the same bucket iff their keys are equal.

use std::sync::Arc;

/// A routing destination with a stable identity.
///
/// The ring keeps a clone of every bucket it knows and hands clones back from
/// lookups, so keep implementors cheap to clone; heavy state (connections,
/// pools) belongs behind an `Arc` elsewhere.
pub trait Bucket: Clone + Send + Sync + 'static {
    /// Stable identity of this bucket.
    fn key(&self) -> &str;
}

impl Bucket for String {
    fn key(&self) -> &str {
        self
    }
}

impl Bucket for &'static str {
    fn key(&self) -> &str {
        self
    }
}

impl Bucket for Arc<str> {
    fn key(&self) -> &str {
        self
    }
}
