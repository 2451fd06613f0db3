//! Error types for the hash ring.

use thiserror::Error;

/// Result type alias for the hash ring.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or mutating a ring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The ring configuration is unusable (for example, no hasher).
    ///
    /// Only ever returned at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A distribution pass could not place a partition under the load cap.
    ///
    /// The committed ring is left exactly as it was before the call.
    #[error(
        "Capacity exhausted: partition {partition} fits no bucket under load cap {avg_load} \
         ({buckets} buckets), try adding buckets or virtual nodes"
    )]
    CapacityExhausted {
        /// The partition that could not be placed.
        partition: usize,
        /// The per-bucket cap in force for the failed pass.
        avg_load: usize,
        /// Number of buckets the pass was run over.
        buckets: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::InvalidConfiguration("hasher can not be missing".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: hasher can not be missing"
        );

        let err = Error::CapacityExhausted {
            partition: 4,
            avg_load: 2,
            buckets: 3,
        };
        assert!(err.to_string().starts_with("Capacity exhausted: partition 4"));
    }
}
