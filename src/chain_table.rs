//! ChainTable: bucket array of linked lists with pluggable hash, equality and release.

use crate::bucket_list::{self, BucketList};
use crate::config::{check_load_factor, TableConfig};
use crate::error::TableError;
use crate::functions::{ByValue, DropValue, KeyEq, KeyHasher, Release, StdHash};
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::hash::Hash;
use log::{debug, trace};

/// One stored key/value pair. The key's hash is computed once on insert
/// and reused when the table grows.
#[derive(Clone, Debug)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    hash: u32,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Output of the table's hasher for this key.
    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }
}

/// Whether `put` added a new key or overwrote an existing one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PutOutcome {
    Inserted,
    Replaced,
}

#[derive(Debug)]
pub struct ChainTable<K, V, H = StdHash, E = ByValue, R = DropValue>
where
    R: Release<V>,
{
    buckets: Vec<BucketList<Entry<K, V>>>,
    len: usize,
    hasher: H,
    eq: E,
    release: R,
    config: TableConfig,
}

fn alloc_buckets<T>(count: usize) -> Result<Vec<BucketList<T>>, TableError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(count)
        .map_err(|source| TableError::Alloc {
            buckets: count,
            source,
        })?;
    buckets.resize_with(count, BucketList::new);
    Ok(buckets)
}

impl<K, V> ChainTable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        let config = TableConfig::new();
        Self {
            buckets: (0..config.initial_buckets).map(|_| BucketList::new()).collect(),
            len: 0,
            hasher: StdHash::default(),
            eq: ByValue,
            release: DropValue,
            config,
        }
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::with_functions(config, StdHash::default(), ByValue, DropValue)
    }
}

impl<K, V> Default for ChainTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in bucket order, then insertion order within a bucket.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, BucketList<Entry<K, V>>>,
    current: Option<bucket_list::Iter<'a, Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.as_mut().and_then(|it| it.next()) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

// Operations that never hash or compare keys.
impl<K, V, H, E, R> ChainTable<K, V, H, E, R>
where
    R: Release<V>,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// Apply `visitor` to every entry, bucket by bucket.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        for entry in self.iter() {
            visitor(&entry.key, &entry.value);
        }
    }

    pub fn for_each_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&K, &mut V),
    {
        for bucket in &mut self.buckets {
            bucket.for_each_mut(|entry| visitor(&entry.key, &mut entry.value));
        }
    }

    /// Snapshot of every entry ordered by `compare`.
    ///
    /// The snapshot borrows the table's storage; nothing is copied. Sorting
    /// is stable, so entries comparing equal keep iteration order. An empty
    /// table yields an empty vector.
    pub fn sort<F>(&self, mut compare: F) -> Vec<&Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>, &Entry<K, V>) -> Ordering,
    {
        let mut snapshot: Vec<&Entry<K, V>> = self.iter().collect();
        snapshot.sort_by(|a, b| compare(a, b));
        snapshot
    }

    pub fn sorted_by_key(&self) -> Vec<&Entry<K, V>>
    where
        K: Ord,
    {
        self.sort(|a, b| a.key.cmp(&b.key))
    }

    /// Release every value and drop every key. The bucket count is kept.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            for entry in bucket.drain() {
                self.len -= 1;
                self.release.release(entry.value);
            }
        }
        debug_assert_eq!(self.len, 0);
    }
}

impl<K, V, H, E, R> ChainTable<K, V, H, E, R>
where
    H: KeyHasher<K>,
    E: KeyEq<K>,
    R: Release<V>,
{
    /// Build a table from explicit hash, equality and release policies.
    /// All three stay fixed for the table's lifetime.
    pub fn with_functions(
        config: TableConfig,
        hasher: H,
        eq: E,
        release: R,
    ) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self {
            buckets: alloc_buckets(config.initial_buckets)?,
            len: 0,
            hasher,
            eq,
            release,
            config,
        })
    }

    #[inline]
    fn index_for(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    /// Bucket index and hash for a lookup key.
    #[inline]
    fn locate<Q>(&self, q: &Q) -> (usize, u32)
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        let hash = <H as KeyHasher<Q>>::hash_key(&self.hasher, q);
        (self.index_for(hash), hash)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let (index, hash) = self.locate(q);
        self.buckets[index]
            .find(|e| e.hash == hash && <E as KeyEq<Q>>::key_eq(&self.eq, q, e.key.borrow()))
            .map(|e| &e.value)
    }

    /// Mutable access to a stored value; writes land in the table.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let (index, hash) = self.locate(q);
        let eq = &self.eq;
        self.buckets[index]
            .find_mut(|e| e.hash == hash && <E as KeyEq<Q>>::key_eq(eq, q, e.key.borrow()))
            .map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.get(q).is_some()
    }

    /// Unlink the entry equal to `q` from bucket `index`.
    fn unlink<Q>(&mut self, index: usize, hash: u32, q: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: KeyEq<Q>,
    {
        let eq = &self.eq;
        let bucket = &mut self.buckets[index];
        let pos =
            bucket.position(|e| e.hash == hash && <E as KeyEq<Q>>::key_eq(eq, q, e.key.borrow()))?;
        let entry = bucket.remove_at(pos)?;
        self.len -= 1;
        Some(entry)
    }

    /// Insert or overwrite using the configured load factor.
    pub fn put(&mut self, key: K, value: V) -> Result<PutOutcome, TableError> {
        self.put_with_load_factor(key, value, self.config.max_load_factor)
    }

    /// Insert copies of borrowed data, e.g. `&str` into a `String`-keyed table.
    pub fn put_copy<Q, W>(&mut self, key: &Q, value: &W) -> Result<PutOutcome, TableError>
    where
        Q: ?Sized + ToOwned<Owned = K>,
        W: ?Sized + ToOwned<Owned = V>,
    {
        self.put(key.to_owned(), value.to_owned())
    }

    /// Insert or overwrite.
    ///
    /// Growth is checked first, against the size before this insert. An
    /// existing entry with an equal key is removed (its value goes through
    /// the release policy) and the new entry is appended to the end of its
    /// bucket.
    pub fn put_with_load_factor(
        &mut self,
        key: K,
        value: V,
        max_load_factor: f64,
    ) -> Result<PutOutcome, TableError> {
        self.maybe_resize(max_load_factor)?;

        let hash = self.hasher.hash_key(&key);
        let index = self.index_for(hash);
        let outcome = match self.unlink(index, hash, &key) {
            Some(old) => {
                trace!("put: replacing entry in bucket {index}");
                self.release.release(old.value);
                PutOutcome::Replaced
            }
            None => PutOutcome::Inserted,
        };

        self.buckets[index].push_back(Entry { key, value, hash });
        self.len += 1;
        Ok(outcome)
    }

    /// Remove the entry for `q`, passing its value to the release policy.
    /// Returns false if no entry matched.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        match self.take(q) {
            Some((_key, value)) => {
                self.release.release(value);
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `q` and hand back ownership without running
    /// the release policy.
    pub fn take<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let (index, hash) = self.locate(q);
        let entry = self.unlink(index, hash, q)?;
        trace!("removed entry from bucket {index}");
        Some((entry.key, entry.value))
    }

    /// Double the bucket count if the current load has reached
    /// `max_load_factor`. Returns whether the table grew.
    pub fn maybe_resize(&mut self, max_load_factor: f64) -> Result<bool, TableError> {
        check_load_factor(max_load_factor)?;
        let comparison = self.config.load_comparison;
        if !comparison.reached(self.len, self.buckets.len(), max_load_factor) {
            return Ok(false);
        }
        self.grow()?;
        Ok(true)
    }

    /// Move every entry into a bucket array twice as long. Entries are
    /// visited bucket by bucket, front to back, and appended, so entries
    /// sharing a new bucket keep their relative order.
    fn grow(&mut self) -> Result<(), TableError> {
        let old_count = self.buckets.len();
        let new_count = old_count
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow { buckets: old_count })?;
        let mut fresh = alloc_buckets(new_count)?;

        for bucket in &mut self.buckets {
            for entry in bucket.drain() {
                fresh[entry.hash as usize % new_count].push_back(entry);
            }
        }
        self.buckets = fresh;

        debug!(
            "grew table from {old_count} to {new_count} buckets ({} entries)",
            self.len
        );
        Ok(())
    }
}

impl<K, V, H, E, R> Drop for ChainTable<K, V, H, E, R>
where
    R: Release<V>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, K, V, H, E, R> IntoIterator for &'a ChainTable<K, V, H, E, R>
where
    R: Release<V>,
{
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
