//! Metric names and recording helpers.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! application installs a recorder.

use std::time::Duration;

use ::metrics::{counter, gauge, histogram};

pub const REDISTRIBUTIONS_TOTAL: &str = "hashring_redistributions_total";
pub const REDISTRIBUTION_SECONDS: &str = "hashring_redistribution_seconds";
pub const CAPACITY_EXHAUSTED_TOTAL: &str = "hashring_capacity_exhausted_total";
pub const VNODE_COLLISIONS_TOTAL: &str = "hashring_vnode_collisions_total";
pub const BUCKETS: &str = "hashring_buckets";

pub(crate) fn record_redistribution(elapsed: Duration, buckets: usize) {
    counter!(REDISTRIBUTIONS_TOTAL).increment(1);
    histogram!(REDISTRIBUTION_SECONDS).record(elapsed.as_secs_f64());
    gauge!(BUCKETS).set(buckets as f64);
}

pub(crate) fn record_capacity_exhausted() {
    counter!(CAPACITY_EXHAUSTED_TOTAL).increment(1);
}

pub(crate) fn record_vnode_collision() {
    counter!(VNODE_COLLISIONS_TOTAL).increment(1);
}

pub(crate) fn record_bucket_count(buckets: usize) {
    gauge!(BUCKETS).set(buckets as f64);
}
