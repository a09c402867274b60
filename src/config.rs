//! Table construction parameters.

use crate::error::TableError;

/// Bucket count used when none is given.
pub const DEFAULT_INITIAL_BUCKETS: usize = 10;

/// Growth threshold used by [`ChainTable::put`](crate::ChainTable::put).
/// At 1.0 the table doubles once it holds as many entries as buckets.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 1.0;

/// How `len / bucket_count` is compared against the load factor.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum LoadComparison {
    /// Floating-point ratio.
    #[default]
    Exact,
    /// Integer division before comparing, so a table with 3 entries in 2
    /// buckets reports a load of 1. Only differs from `Exact` for
    /// non-integral thresholds.
    Truncating,
}

impl LoadComparison {
    /// Returns true when a table with `len` entries spread over `buckets`
    /// buckets has reached `max_load_factor`.
    pub fn reached(self, len: usize, buckets: usize, max_load_factor: f64) -> bool {
        debug_assert!(buckets > 0);
        let load = match self {
            LoadComparison::Exact => len as f64 / buckets as f64,
            LoadComparison::Truncating => (len / buckets) as f64,
        };
        load >= max_load_factor
    }
}

/// Parameters fixed at table creation.
///
/// ```
/// use chain_table::{LoadComparison, TableConfig};
///
/// let config = TableConfig::new()
///     .initial_buckets(2)
///     .max_load_factor(0.75)
///     .load_comparison(LoadComparison::Truncating);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub initial_buckets: usize,
    pub max_load_factor: f64,
    pub load_comparison: LoadComparison,
}

impl TableConfig {
    pub const fn new() -> Self {
        Self {
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            load_comparison: LoadComparison::Exact,
        }
    }

    pub fn initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    pub fn max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn load_comparison(mut self, load_comparison: LoadComparison) -> Self {
        self.load_comparison = load_comparison;
        self
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_buckets == 0 {
            return Err(TableError::ZeroBuckets);
        }
        check_load_factor(self.max_load_factor)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_load_factor(max_load_factor: f64) -> Result<(), TableError> {
    if max_load_factor.is_finite() && max_load_factor > 0.0 {
        Ok(())
    } else {
        Err(TableError::InvalidLoadFactor(max_load_factor))
    }
}
