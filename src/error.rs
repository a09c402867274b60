//! Error types for the `chain-table` crate

use std::collections::TryReserveError;

/// Errors raised while building or growing a table, or by positional
/// bucket-list operations.
///
/// A missing key is not an error: lookups return `None` and removals
/// return `false`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// A table needs at least one bucket to index into.
    #[error("bucket count must be at least 1")]
    ZeroBuckets,

    /// The load factor must be a finite number above zero.
    ///
    /// Zero would double the table on every insert and NaN would never
    /// trigger growth at all.
    #[error("max load factor must be finite and positive, got {0}")]
    InvalidLoadFactor(f64),

    /// Positional insert past the end of a bucket list.
    #[error("index {index} out of range for bucket list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Doubling the bucket count would overflow `usize`.
    #[error("cannot double a table of {buckets} buckets")]
    CapacityOverflow { buckets: usize },

    /// The allocator refused the bucket array.
    #[error("failed to allocate {buckets} buckets")]
    Alloc {
        buckets: usize,
        #[source]
        source: TryReserveError,
    },
}
