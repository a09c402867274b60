//! chain-table: a single-threaded chaining hashtable with pluggable key
//! hashing, key equality, and value release.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative store whose identity (hash + equality) and
//!   value disposal are chosen per table, with growth that never loses or
//!   duplicates an entry.
//! - Layers:
//!   - BucketList<T>: singly linked sequence over a slot arena with
//!     positional insert/remove and O(1) append. Knows nothing about keys.
//!   - ChainTable<K, V, H, E, R>: array of BucketLists indexed by
//!     `hash % bucket_count`, an entry count, and the three policies
//!     (`KeyHasher`, `KeyEq`, `Release`) fixed at construction.
//!   - functions: the stock policies (`IntHash`, `Djb2`, `StdHash`,
//!     `ByValue`, `DropValue`); closures work too.
//!
//! Constraints
//! - Single-threaded; mutation goes through `&mut self`.
//! - Keys are unique table-wide under `KeyEq`; `put` on an existing key
//!   overwrites (the old value goes through `Release`).
//! - The bucket count starts at `TableConfig::initial_buckets` and only
//!   ever doubles.
//! - `len()` always equals the number of entries across all buckets.
//!
//! Growth
//! - `put` checks the load *before* inserting, against the size prior to
//!   the insert. With the default load factor of 1.0 the table doubles
//!   once it already holds as many entries as buckets.
//! - The comparison is a true ratio by default; `LoadComparison::Truncating`
//!   reproduces integer-division behavior for callers that depend on it.
//! - Each entry stores the hash computed at insert time, so growth moves
//!   nodes without calling back into the hasher.
//!
//! Ownership
//! - The table owns every key and value. `put` takes them by value and
//!   `put_copy` clones borrowed data first, so caller buffers are never
//!   aliased.
//! - `get` hands out a reference into the stored value; `sort` returns a
//!   snapshot of references. Both borrow the table, so it cannot be
//!   mutated or dropped while they are alive.
//! - `Release` runs on overwrite, `remove_entry`, `clear` and drop.
//!   `take` returns ownership and skips it.
//!
//! Failure semantics
//! - Bucket-array allocation uses `try_reserve_exact` and surfaces as
//!   `TableError::Alloc`, leaving the table as it was.
//! - A missing key is `None`/`false`, never an error.

pub mod bucket_list;
mod chain_table;
mod chain_table_proptest;
pub mod config;
pub mod error;
pub mod functions;

// Public surface
pub use bucket_list::BucketList;
pub use chain_table::{ChainTable, Entry, Iter, PutOutcome};
pub use config::{LoadComparison, TableConfig};
pub use error::TableError;
pub use functions::{djb2, int_hash, ByValue, Djb2, DropValue, IntHash, KeyEq, KeyHasher, Release, StdHash};
